use super::Labels;

pub const PACIENTE_LABELS: Labels = Labels {
    singular: "el paciente",
    plural: "pacientes",
    feminine: false,
    key: "Paciente",
    plural_key: "Pacientes",
    update_verb: "editar",
};

crate::person_entity! {
    /// Patient. `numeroDocumento` is unique across patients.
    Paciente {
        id: idpaciente,
        kind: Paciente,
        resource: "pacientes",
        labels: PACIENTE_LABELS,
        unique_document: true,
        extra: [ocupacion],
    }
}

crate::entity_ref!(PacienteRef => Paciente, idpaciente);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentKeyed, Entity};

    fn sample() -> Paciente {
        Paciente {
            idpaciente: Some(1),
            nombres: "Laura".into(),
            apellidos: "Gómez".into(),
            tipo_documento: "CC".into(),
            numero_documento: "123".into(),
            fecha_nacimiento: "1990-04-12".into(),
            sexo: "F".into(),
            telefono: "3001234567".into(),
            correo: "laura@example.com".into(),
            direccion: "Calle 1".into(),
            ocupacion: "Docente".into(),
            username: "laura".into(),
            password: "secreto".into(),
            estado: "Activo".into(),
        }
    }

    #[test]
    fn test_overwrite_keeps_identity() {
        let mut current = sample();
        let mut incoming = sample();
        incoming.idpaciente = Some(99);
        incoming.nombres = "Lucía".into();
        incoming.numero_documento = "124".into();

        current.overwrite_from(&incoming);

        assert_eq!(current.idpaciente, Some(1));
        assert_eq!(current.nombres, "Lucía");
        assert_eq!(current.numero_documento(), "124");
    }

    #[test]
    fn test_unique_key_is_document() {
        assert_eq!(sample().unique_key(), Some(("numero_documento", "123")));
    }

    #[test]
    fn test_missing_id_deserializes_as_none() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json.as_object_mut().unwrap().remove("idpaciente");
        let paciente: Paciente = serde_json::from_value(json).unwrap();
        assert_eq!(paciente.id(), None);
    }
}
