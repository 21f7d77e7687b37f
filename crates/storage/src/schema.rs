// Mirrors the DDL in `db::schema_init`. The central MySQL server is expected
// to expose the same tables and columns.

diesel::table! {
    assets (id) {
        id -> Integer,
        model -> Nullable<Text>,
        serial_number -> Text,
        company -> Nullable<Text>,
        location -> Nullable<Text>,
        purchase_date -> Nullable<Text>,
        status -> Nullable<Text>,
        last_sync -> Nullable<Text>,
    }
}

diesel::table! {
    asset_images (id) {
        id -> Integer,
        asset_id -> Integer,
        image_name -> Nullable<Text>,
        image_data -> Nullable<Binary>,
        last_sync -> Nullable<Text>,
    }
}

diesel::table! {
    asset_bills (id) {
        id -> Integer,
        asset_id -> Integer,
        bill_name -> Nullable<Text>,
        bill_data -> Nullable<Binary>,
        last_sync -> Nullable<Text>,
    }
}

diesel::joinable!(asset_images -> assets (asset_id));
diesel::joinable!(asset_bills -> assets (asset_id));

diesel::allow_tables_to_appear_in_same_query!(assets, asset_images, asset_bills,);
