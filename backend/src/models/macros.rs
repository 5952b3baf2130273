/// Defines one of the person records (administrators, doctors, patients).
///
/// All three share the identity-document and contact fields and differ only in
/// a few trailing text columns. The macro generates:
/// - the struct with camelCase serde names and an optional store id
/// - `Entity` (field table, full overwrite, optional unique document key)
/// - `DocumentKeyed`
///
/// Usage:
///   person_entity! {
///       /// A patient.
///       Paciente {
///           id: idpaciente,
///           kind: Paciente,
///           resource: "pacientes",
///           labels: PACIENTE_LABELS,
///           unique_document: true,
///           extra: [ocupacion],
///       }
///   }
#[macro_export]
macro_rules! person_entity {
    (
        $(#[$meta:meta])*
        $name:ident {
            id: $id:ident,
            kind: $kind:ident,
            resource: $resource:literal,
            labels: $labels:expr,
            unique_document: $unique:literal,
            extra: [$($extra:ident),* $(,)?] $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(default)]
            pub $id: Option<i64>,
            pub nombres: String,
            pub apellidos: String,
            pub tipo_documento: String,
            pub numero_documento: String,
            pub fecha_nacimiento: String,
            pub sexo: String,
            pub telefono: String,
            pub correo: String,
            pub direccion: String,
            $(pub $extra: String,)*
            pub username: String,
            pub password: String,
            pub estado: String,
        }

        impl $crate::models::Entity for $name {
            const KIND: $crate::models::EntityKind = $crate::models::EntityKind::$kind;
            const RESOURCE: &'static str = $resource;
            const LABELS: $crate::models::Labels = $labels;
            const FIELDS: &'static [$crate::models::FieldSpec] = &[
                $crate::models::FieldSpec::text("nombres"),
                $crate::models::FieldSpec::text("apellidos"),
                $crate::models::FieldSpec::text("tipoDocumento"),
                $crate::models::FieldSpec::text("numeroDocumento"),
                $crate::models::FieldSpec::text("fechaNacimiento"),
                $crate::models::FieldSpec::text("sexo"),
                $crate::models::FieldSpec::text("telefono"),
                $crate::models::FieldSpec::text("correo"),
                $crate::models::FieldSpec::text("direccion"),
                $($crate::models::FieldSpec::text(stringify!($extra)),)*
                $crate::models::FieldSpec::text("username"),
                $crate::models::FieldSpec::text("password"),
                $crate::models::FieldSpec::text("estado"),
            ];

            fn id(&self) -> Option<i64> {
                self.$id
            }

            fn set_id(&mut self, id: Option<i64>) {
                self.$id = id;
            }

            fn overwrite_from(&mut self, source: &Self) {
                self.nombres = source.nombres.clone();
                self.apellidos = source.apellidos.clone();
                self.tipo_documento = source.tipo_documento.clone();
                self.numero_documento = source.numero_documento.clone();
                self.fecha_nacimiento = source.fecha_nacimiento.clone();
                self.sexo = source.sexo.clone();
                self.telefono = source.telefono.clone();
                self.correo = source.correo.clone();
                self.direccion = source.direccion.clone();
                $(self.$extra = source.$extra.clone();)*
                self.username = source.username.clone();
                self.password = source.password.clone();
                self.estado = source.estado.clone();
            }

            fn unique_key(&self) -> Option<(&'static str, &str)> {
                if $unique {
                    Some(("numero_documento", self.numero_documento.as_str()))
                } else {
                    None
                }
            }
        }

        impl $crate::models::DocumentKeyed for $name {
            fn numero_documento(&self) -> &str {
                &self.numero_documento
            }
        }
    };
}

/// Defines the reference a patient-scoped record holds to one of its parents.
///
/// Clients send only the id (`{"idpaciente": 1}`). Repositories attach the
/// referenced record when reading, and an attached reference serializes as
/// that full record. References compare by id.
///
/// Usage:
///   entity_ref!(PacienteRef => Paciente, idpaciente);
#[macro_export]
macro_rules! entity_ref {
    ($name:ident => $target:ident, $id:ident) => {
        #[derive(Debug, Clone, serde::Deserialize)]
        pub struct $name {
            pub $id: i64,
            #[serde(skip)]
            pub record: Option<Box<$target>>,
        }

        impl $name {
            pub fn new($id: i64) -> Self {
                Self { $id, record: None }
            }

            /// Embeds the referenced record.
            pub fn attach(&mut self, record: $target) {
                self.record = Some(Box::new(record));
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.$id == other.$id
            }
        }

        impl Eq for $name {}

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                use serde::ser::SerializeStruct;

                match &self.record {
                    Some(record) => serde::Serialize::serialize(record.as_ref(), serializer),
                    None => {
                        let mut state = serializer.serialize_struct(stringify!($name), 1)?;
                        state.serialize_field(stringify!($id), &self.$id)?;
                        state.end()
                    }
                }
            }
        }
    };
}
