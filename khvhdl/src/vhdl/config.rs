/// How many hierarchy levels are converted into separate components.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Depth {
    Unlimited,
    /// `Limited(0)` converts the design flat, `Limited(1)` converts one level of components, ...
    Limited(u32),
}

impl Depth {
    pub fn is_flat(&self) -> bool {
        *self == Depth::Limited(0)
    }

    /// The depth remaining for a component one level down.
    pub fn descend(&self) -> Depth {
        match *self {
            Depth::Unlimited => Depth::Unlimited,
            Depth::Limited(n) => Depth::Limited(n.saturating_sub(1)),
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Unlimited
    }
}

/// Conversion options.
///
/// # Examples
///
/// ```
/// use khvhdl::vhdl::*;
///
/// let config = Config::new()
///     .library("work")
///     .max_depth(Depth::Limited(1))
///     .use_clauses("use work.my_types.all;");
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    pub(crate) library: String,
    pub(crate) architecture: String,
    pub(crate) max_depth: Depth,
    pub(crate) no_component_files: bool,
    pub(crate) name: Option<String>,
    pub(crate) header: Option<String>,
    pub(crate) use_clauses: Option<String>,
    pub(crate) component_declarations: Option<String>,
    pub(crate) no_support_package: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            library: "work".into(),
            architecture: "KH".into(),
            max_depth: Depth::Unlimited,
            no_component_files: false,
            name: None,
            header: None,
            use_clauses: None,
            component_declarations: None,
            no_support_package: false,
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    pub fn library(mut self, library: impl Into<String>) -> Config {
        self.library = library.into();
        self
    }

    pub fn architecture(mut self, architecture: impl Into<String>) -> Config {
        self.architecture = architecture.into();
        self
    }

    pub fn max_depth(mut self, max_depth: Depth) -> Config {
        self.max_depth = max_depth;
        self
    }

    /// Records components and instantiates them without writing their files.
    pub fn no_component_files(mut self, no_component_files: bool) -> Config {
        self.no_component_files = no_component_files;
        self
    }

    /// Name of the top-level entity; defaults to the top block's name.
    pub fn name(mut self, name: impl Into<String>) -> Config {
        self.name = Some(name.into());
        self
    }

    /// Extra text for the comment header of every generated file.
    pub fn header(mut self, header: impl Into<String>) -> Config {
        self.header = Some(header.into());
        self
    }

    pub fn use_clauses(mut self, use_clauses: impl Into<String>) -> Config {
        self.use_clauses = Some(use_clauses.into());
        self
    }

    /// Raw text for the top-level architecture's declarative region.
    pub fn component_declarations(mut self, component_declarations: impl Into<String>) -> Config {
        self.component_declarations = Some(component_declarations.into());
        self
    }

    pub fn library_name(&self) -> &str {
        &self.library
    }

    pub fn depth(&self) -> Depth {
        self.max_depth
    }

    /// Derives the configuration for converting component `name` one level down.
    pub(crate) fn for_component(&self, name: &str) -> Config {
        Config {
            name: Some(name.to_string()),
            max_depth: self.max_depth.descend(),
            component_declarations: None,
            no_support_package: true,
            ..self.clone()
        }
    }
}
