use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a type as it appears in an exported declaration.
///
/// Every variant has two renderings: the `Display` form, which uses short
/// package names and is meant for humans, and the canonical key, which uses
/// full import paths and is the only thing ever compared. The key must be
/// injective: two different types never share a key. The display form may
/// collide (two packages named `errors`, say) and is never used for equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeIdentifier {
    /// A builtin type or a type declared in the same package.
    Local { name: String },
    /// A type declared in another package.
    Imported { package: String, name: String },
    Pointer { elem: Box<TypeIdentifier> },
    Slice { elem: Box<TypeIdentifier> },
    Array { len: String, elem: Box<TypeIdentifier> },
    /// The element type of a variadic parameter.
    Ellipsis { elem: Box<TypeIdentifier> },
    Map {
        key: Box<TypeIdentifier>,
        value: Box<TypeIdentifier>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeIdentifier>,
    },
    Func(FuncType),
    Struct { fields: Vec<StructField> },
    Interface { elems: Vec<InterfaceElem> },
    /// An instantiated generic type such as `List[int]`.
    Generic {
        base: Box<TypeIdentifier>,
        args: Vec<TypeIdentifier>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Parameter and result types of a function, in declaration order.
///
/// A field declaring several names (`a, b int`) contributes one entry per name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncType {
    pub params: Vec<TypeIdentifier>,
    pub results: Vec<TypeIdentifier>,
}

/// An exported field of a struct type. `name` is `None` for embedded fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: Option<String>,
    pub ty: TypeIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "elem", rename_all = "snake_case")]
pub enum InterfaceElem {
    Method { name: String, sig: FuncType },
    Embedded { ty: TypeIdentifier },
    /// A type set such as `~int | ~float64`, terms sorted by key.
    Union { terms: Vec<TypeTerm> },
    /// Present when the interface declares at least one unexported method,
    /// which keeps other packages from implementing it.
    Unexported,
}

/// One term of a type set: `T`, or `~T` for every type whose underlying type is `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTerm {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub tilde: bool,
    pub ty: TypeIdentifier,
}

/// A declared type parameter. The constraint is a union of terms; `any`
/// and `comparable` are single local terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Vec<TypeTerm>,
}

impl TypeIdentifier {
    pub fn local(name: impl Into<String>) -> Self {
        Self::Local { name: name.into() }
    }

    pub fn imported(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Imported {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(elem: TypeIdentifier) -> Self {
        Self::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeIdentifier) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn ellipsis(elem: TypeIdentifier) -> Self {
        Self::Ellipsis {
            elem: Box::new(elem),
        }
    }

    /// The fully qualified, alias-independent key used for equality.
    pub fn canonical_key(&self) -> String {
        let mut out = String::new();
        self.write_key(&mut out);
        out
    }

    /// Two identifiers denote the same type iff their canonical keys match.
    pub fn same_type(&self, other: &TypeIdentifier) -> bool {
        self.canonical_key() == other.canonical_key()
    }

    /// The declared name behind pointers and type arguments, e.g. `List` for `*List[T]`.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            Self::Local { name } | Self::Imported { name, .. } => Some(name),
            Self::Pointer { elem } => elem.base_name(),
            Self::Generic { base, .. } => base.base_name(),
            _ => None,
        }
    }

    fn write_key(&self, out: &mut String) {
        match self {
            Self::Local { name } => out.push_str(name),
            Self::Imported { package, name } => {
                out.push_str(package);
                out.push('.');
                out.push_str(name);
            }
            Self::Pointer { elem } => {
                out.push('*');
                elem.write_key(out);
            }
            Self::Slice { elem } => {
                out.push_str("[]");
                elem.write_key(out);
            }
            Self::Array { len, elem } => {
                out.push('[');
                out.push_str(len);
                out.push(']');
                elem.write_key(out);
            }
            Self::Ellipsis { elem } => {
                out.push_str("...");
                elem.write_key(out);
            }
            Self::Map { key, value } => {
                out.push_str("map[");
                key.write_key(out);
                out.push(']');
                value.write_key(out);
            }
            Self::Chan { dir, elem } => {
                out.push_str(dir.prefix());
                elem.write_key(out);
            }
            Self::Func(func) => func.write_key(out),
            Self::Struct { fields } => {
                out.push_str("struct{");
                for field in fields {
                    match &field.name {
                        Some(name) => {
                            out.push_str(name);
                            out.push(' ');
                        }
                        None => out.push_str("embed "),
                    }
                    field.ty.write_key(out);
                    out.push(';');
                }
                out.push('}');
            }
            Self::Interface { elems } => {
                out.push_str("interface{");
                for elem in elems {
                    match elem {
                        InterfaceElem::Method { name, sig } => {
                            out.push_str(name);
                            out.push(' ');
                            sig.write_key(out);
                        }
                        InterfaceElem::Embedded { ty } => {
                            out.push_str("embed ");
                            ty.write_key(out);
                        }
                        InterfaceElem::Union { terms } => {
                            out.push_str("union ");
                            write_terms_key(terms, out);
                        }
                        InterfaceElem::Unexported => out.push_str("unexported"),
                    }
                    out.push(';');
                }
                out.push('}');
            }
            Self::Generic { base, args } => {
                base.write_key(out);
                out.push('[');
                for arg in args {
                    arg.write_key(out);
                    out.push(',');
                }
                out.push(']');
            }
        }
    }
}

impl ChanDir {
    fn prefix(self) -> &'static str {
        match self {
            ChanDir::Both => "chan ",
            ChanDir::Send => "chan<- ",
            ChanDir::Recv => "<-chan ",
        }
    }
}

impl FuncType {
    pub fn canonical_key(&self) -> String {
        let mut out = String::new();
        self.write_key(&mut out);
        out
    }

    // Results are parenthesized too, otherwise `func(func(A,)B,C,)` could
    // read as an inner function returning either `B` or `B, C`.
    fn write_key(&self, out: &mut String) {
        out.push_str("func(");
        for param in &self.params {
            param.write_key(out);
            out.push(',');
        }
        out.push_str(")(");
        for result in &self.results {
            result.write_key(out);
            out.push(',');
        }
        out.push(')');
    }

    /// Parameter and result lists as they follow a function name, e.g. `(int, string) error`.
    pub fn signature_suffix(&self) -> String {
        let params = join_display(&self.params);
        match self.results.len() {
            0 => format!("({})", params),
            1 => format!("({}) {}", params, self.results[0]),
            _ => format!("({}) ({})", params, join_display(&self.results)),
        }
    }
}

impl InterfaceElem {
    /// Sort key giving interfaces an order-independent canonical form.
    pub fn sort_key(&self) -> String {
        match self {
            InterfaceElem::Method { name, .. } => format!("0{}", name),
            InterfaceElem::Embedded { ty } => format!("1{}", ty.canonical_key()),
            InterfaceElem::Union { terms } => {
                let mut key = String::from("2");
                write_terms_key(terms, &mut key);
                key
            }
            InterfaceElem::Unexported => "3".to_string(),
        }
    }
}

impl TypeTerm {
    pub fn new(ty: TypeIdentifier) -> Self {
        Self { tilde: false, ty }
    }

    pub fn canonical_key(&self) -> String {
        let mut out = String::new();
        self.write_key(&mut out);
        out
    }

    fn write_key(&self, out: &mut String) {
        if self.tilde {
            out.push('~');
        }
        self.ty.write_key(out);
    }
}

// Each term is terminated, so `A|B|` never reads as a single term.
fn write_terms_key(terms: &[TypeTerm], out: &mut String) {
    for term in terms {
        term.write_key(out);
        out.push('|');
    }
}

impl TypeParam {
    fn write_key(&self, out: &mut String) {
        out.push_str(&self.name);
        out.push(' ');
        write_terms_key(&self.constraint, out);
        out.push(',');
    }
}

/// Key of a type parameter list, empty for non-generic declarations.
pub fn type_params_key(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let mut out = String::from("[");
    for param in params {
        param.write_key(&mut out);
    }
    out.push(']');
    out
}

/// Display form of a type parameter list, e.g. `[K comparable, V any]`.
pub fn type_params_display(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let params: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("[{}]", params.join(", "))
}

/// Short name used to refer to a package in display output.
///
/// This is the last path segment, skipping a trailing major-version segment
/// (`example.com/mod/v2` → `mod`) and stripping a `gopkg.in`-style suffix
/// (`gopkg.in/yaml.v3` → `yaml`).
pub fn package_short_name(path: &str) -> &str {
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or(path);
    let name = if is_major_version(last) {
        segments.next().unwrap_or(last)
    } else {
        last
    };

    if path.starts_with("gopkg.in/") {
        if let Some((base, suffix)) = name.rsplit_once('.') {
            if is_major_version(suffix) {
                return base;
            }
        }
    }
    name
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

fn join_display(types: &[TypeIdentifier]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { name } => write!(f, "{}", name),
            Self::Imported { package, name } => {
                write!(f, "{}.{}", package_short_name(package), name)
            }
            Self::Pointer { elem } => write!(f, "*{}", elem),
            Self::Slice { elem } => write!(f, "[]{}", elem),
            Self::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            Self::Ellipsis { elem } => write!(f, "...{}", elem),
            Self::Map { key, value } => write!(f, "map[{}]{}", key, value),
            Self::Chan { dir, elem } => write!(f, "{}{}", dir.prefix(), elem),
            Self::Func(func) => write!(f, "{}", func),
            Self::Struct { fields } => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|field| match &field.name {
                        Some(name) => format!("{} {}", name, field.ty),
                        None => field.ty.to_string(),
                    })
                    .collect();
                write!(f, "struct{{{}}}", fields.join("; "))
            }
            Self::Interface { elems } => {
                let elems: Vec<String> = elems
                    .iter()
                    .map(|elem| match elem {
                        InterfaceElem::Method { name, sig } => {
                            format!("{}{}", name, sig.signature_suffix())
                        }
                        InterfaceElem::Embedded { ty } => ty.to_string(),
                        InterfaceElem::Union { terms } => join_terms(terms),
                        InterfaceElem::Unexported => "unexported methods".to_string(),
                    })
                    .collect();
                write!(f, "interface{{{}}}", elems.join("; "))
            }
            Self::Generic { base, args } => write!(f, "{}[{}]", base, join_display(args)),
        }
    }
}

fn join_terms(terms: &[TypeTerm]) -> String {
    terms
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

impl fmt::Display for TypeTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tilde {
            write!(f, "~")?;
        }
        write!(f, "{}", self.ty)
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, join_terms(&self.constraint))
    }
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func{}", self.signature_suffix())
    }
}
