use super::Labels;

pub const MEDICO_LABELS: Labels = Labels {
    singular: "el médico",
    plural: "médicos",
    feminine: false,
    key: "Médico",
    plural_key: "Médicos",
    update_verb: "editar",
};

crate::person_entity! {
    /// Doctor attending appointments, exams and clinical histories.
    Medico {
        id: idmedico,
        kind: Medico,
        resource: "medicos",
        labels: MEDICO_LABELS,
        unique_document: false,
        extra: [especialidad],
    }
}

crate::entity_ref!(MedicoRef => Medico, idmedico);
