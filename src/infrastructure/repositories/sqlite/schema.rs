diesel::table! {
    links (id) {
        id -> Integer,
        ts -> BigInt,
        url -> Text,
        description -> Text,
        extended -> Text,
        via -> Nullable<Text>,
        tags -> Text,
        hash -> Text,
    }
}
