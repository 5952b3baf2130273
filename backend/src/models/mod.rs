pub mod administrador;
pub mod cita_medica;
pub mod entity;
pub mod examen_medico;
pub mod historia_clinica;
pub mod macros;
pub mod medico;
pub mod paciente;
pub mod validation;

pub use administrador::*;
pub use cita_medica::*;
pub use entity::*;
pub use examen_medico::*;
pub use historia_clinica::*;
pub use medico::*;
pub use paciente::*;
pub use validation::{parse_payload, validate_payload};
