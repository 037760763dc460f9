//! Catalogs shipped inside the binary.

/// `(origin, toml source)` pairs, in sidebar order.
pub const BUILTIN_CATALOGS: &[(&str, &str)] = &[
    ("builtin:javascript", include_str!("../../data/javascript.toml")),
    ("builtin:angular", include_str!("../../data/angular.toml")),
    ("builtin:java", include_str!("../../data/java.toml")),
    ("builtin:springboot", include_str!("../../data/springboot.toml")),
    ("builtin:databases", include_str!("../../data/databases.toml")),
    ("builtin:sql", include_str!("../../data/sql.toml")),
    ("builtin:mongodb", include_str!("../../data/mongodb.toml")),
    ("builtin:react", include_str!("../../data/react.toml")),
];

/// Key used when the configuration does not name a default catalog.
pub const DEFAULT_CATALOG_KEY: &str = "javascript";
