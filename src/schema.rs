table! {
    posts (id) {
        id -> BigInt,
        title -> Text,
        description -> Nullable<Text>,
        benefits -> Nullable<Text>,
        nutrients -> Nullable<Text>,
        image_url -> Nullable<Text>,
        category -> Nullable<Text>,
        created_at -> Nullable<Timestamp>,
    }
}
