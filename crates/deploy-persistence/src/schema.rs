//! Esquema Diesel (escrito a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    published_records (network, name) {
        network -> Text,
        name -> Text,
        location -> Text,
        bytecode_ref -> Text,
        constructor_args -> Jsonb,
        libraries -> Jsonb,
        salt -> Text,
        transaction_ref -> Nullable<Text>,
        published_at -> Timestamptz,
        verified -> Bool,
    }
}
