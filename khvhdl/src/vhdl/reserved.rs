/// Prefix prepended to identifiers that collide with a reserved word.
pub const RESERVED_PREFIX: &str = "kh_";

/// Tag prepended to component names starting with `_`, which VHDL identifiers can't start with.
pub const LEADING_UNDERSCORE_TAG: &str = "kh";

// IEEE 1076-2008
const RESERVED_WORDS: &[&str] = &[
    "abs",
    "access",
    "after",
    "alias",
    "all",
    "and",
    "architecture",
    "array",
    "assert",
    "assume",
    "assume_guarantee",
    "attribute",
    "begin",
    "block",
    "body",
    "buffer",
    "bus",
    "case",
    "component",
    "configuration",
    "constant",
    "context",
    "cover",
    "default",
    "disconnect",
    "downto",
    "else",
    "elsif",
    "end",
    "entity",
    "exit",
    "fairness",
    "file",
    "for",
    "force",
    "function",
    "generate",
    "generic",
    "group",
    "guarded",
    "if",
    "impure",
    "in",
    "inertial",
    "inout",
    "is",
    "label",
    "library",
    "linkage",
    "literal",
    "loop",
    "map",
    "mod",
    "nand",
    "new",
    "next",
    "nor",
    "not",
    "null",
    "of",
    "on",
    "open",
    "or",
    "others",
    "out",
    "package",
    "parameter",
    "port",
    "postponed",
    "procedure",
    "process",
    "property",
    "protected",
    "pure",
    "range",
    "record",
    "register",
    "reject",
    "release",
    "rem",
    "report",
    "restrict",
    "restrict_guarantee",
    "return",
    "rol",
    "ror",
    "select",
    "sequence",
    "severity",
    "signal",
    "shared",
    "sla",
    "sll",
    "sra",
    "srl",
    "strong",
    "subtype",
    "then",
    "to",
    "transport",
    "type",
    "unaffected",
    "units",
    "until",
    "use",
    "variable",
    "vmode",
    "vprop",
    "vunit",
    "wait",
    "when",
    "while",
    "with",
    "xnor",
    "xor",
];

/// Exact, case-sensitive match against the reserved word table.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Returns `name`, prefixed if it's a reserved word.
pub fn sanitize(name: &str) -> String {
    if is_reserved(name) {
        format!("{}{}", RESERVED_PREFIX, name)
    } else {
        name.to_string()
    }
}

/// Returns the name port `name` gets in an entity whose ports are `ports`.
///
/// Reserved names are prefixed until they no longer collide with any of `ports`, so renaming never merges two ports.
pub(crate) fn port_name(name: &str, ports: &[String]) -> String {
    if !is_reserved(name) {
        return name.to_string();
    }
    let mut renamed = sanitize(name);
    while ports.iter().any(|port| *port == renamed) {
        renamed = format!("{}{}", RESERVED_PREFIX, renamed);
    }
    renamed
}

/// Returns the entity name used for components of a block called `block_name`.
pub fn component_name(block_name: &str) -> String {
    if block_name.starts_with('_') {
        format!("{}{}", LEADING_UNDERSCORE_TAG, block_name)
    } else {
        block_name.to_string()
    }
}
