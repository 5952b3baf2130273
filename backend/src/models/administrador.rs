use super::Labels;

pub const ADMINISTRADOR_LABELS: Labels = Labels {
    singular: "el administrador",
    plural: "administradores",
    feminine: false,
    key: "Administrador",
    plural_key: "Administradores",
    update_verb: "editar",
};

crate::person_entity! {
    /// Back-office user of the clinic.
    Administrador {
        id: idadministrador,
        kind: Administrador,
        resource: "administradores",
        labels: ADMINISTRADOR_LABELS,
        unique_document: false,
        extra: [ocupacion, rol],
    }
}
