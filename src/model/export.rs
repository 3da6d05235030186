use super::type_id::{FuncType, TypeIdentifier, TypeParam, type_params_display, type_params_key};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One exported declaration of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "export", rename_all = "snake_case")]
pub enum Export {
    Func(FuncSignature),
    Type(TypeSignature),
}

/// An exported function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncSignature {
    pub name: String,
    /// Receiver type for methods, pointer included.
    pub receiver: Option<TypeIdentifier>,
    /// Empty unless the function is generic.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    pub sig: FuncType,
}

/// An exported defined type (`type A B`) or alias (`type A = B`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSignature {
    pub name: String,
    pub alias: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    pub underlying: TypeIdentifier,
}

impl Export {
    /// Identifier unique within the owning package: `Name` or `Receiver.Name`.
    pub fn id(&self) -> String {
        match self {
            Export::Func(func) => func.id(),
            Export::Type(ty) => ty.name.clone(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Export::Func(func) => &func.name,
            Export::Type(ty) => &ty.name,
        }
    }

    /// Canonical string; two exports are unchanged iff their compare keys match.
    pub fn compare_key(&self) -> String {
        match self {
            Export::Func(func) => func.compare_key(),
            Export::Type(ty) => ty.compare_key(),
        }
    }

    pub fn same_as(&self, other: &Export) -> bool {
        self.compare_key() == other.compare_key()
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Export::Func(FuncSignature { receiver: Some(_), .. }))
    }
}

impl FuncSignature {
    pub fn id(&self) -> String {
        match self.receiver.as_ref().and_then(TypeIdentifier::base_name) {
            Some(base) => format!("{}.{}", base, self.name),
            None => self.name.clone(),
        }
    }

    pub fn compare_key(&self) -> String {
        let mut key = String::new();
        if let Some(receiver) = &self.receiver {
            key.push('(');
            key.push_str(&receiver.canonical_key());
            key.push_str(") ");
        }
        key.push_str(&self.name);
        key.push_str(&type_params_key(&self.type_params));
        key.push(' ');
        key.push_str(&self.sig.canonical_key());
        key
    }
}

impl TypeSignature {
    pub fn compare_key(&self) -> String {
        let separator = if self.alias { " = " } else { " " };
        format!(
            "{}{}{}{}",
            self.name,
            type_params_key(&self.type_params),
            separator,
            self.underlying.canonical_key()
        )
    }
}

impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Func(func) => write!(f, "{}", func),
            Export::Type(ty) => write!(f, "{}", ty),
        }
    }
}

impl fmt::Display for FuncSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func ")?;
        if let Some(receiver) = &self.receiver {
            write!(f, "({}) ", receiver)?;
        }
        write!(
            f,
            "{}{}{}",
            self.name,
            type_params_display(&self.type_params),
            self.sig.signature_suffix()
        )
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = type_params_display(&self.type_params);
        if self.alias {
            write!(f, "type {}{} = {}", self.name, params, self.underlying)
        } else {
            write!(f, "type {}{} {}", self.name, params, self.underlying)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeTerm;

    fn int() -> TypeIdentifier {
        TypeIdentifier::local("int")
    }

    #[test]
    fn test_function_id_and_display() {
        let export = Export::Func(FuncSignature {
            name: "F".to_string(),
            receiver: None,
            type_params: Vec::new(),
            sig: FuncType {
                params: vec![int()],
                results: vec![TypeIdentifier::local("error")],
            },
        });
        assert_eq!(export.id(), "F");
        assert_eq!(export.to_string(), "func F(int) error");
        assert_eq!(export.compare_key(), "F func(int,)(error,)");
        assert!(!export.is_method());
    }

    #[test]
    fn test_method_id_strips_pointer_but_key_keeps_it() {
        let method = |receiver: TypeIdentifier| {
            Export::Func(FuncSignature {
                name: "Close".to_string(),
                receiver: Some(receiver),
                type_params: Vec::new(),
                sig: FuncType::default(),
            })
        };
        let by_pointer = method(TypeIdentifier::pointer(TypeIdentifier::local("Client")));
        let by_value = method(TypeIdentifier::local("Client"));

        assert_eq!(by_pointer.id(), "Client.Close");
        assert_eq!(by_value.id(), "Client.Close");
        assert_eq!(by_pointer.to_string(), "func (*Client) Close()");
        assert!(!by_pointer.same_as(&by_value));
        assert!(by_pointer.is_method());
    }

    #[test]
    fn test_alias_and_defined_types_differ() {
        let ty = |alias| {
            Export::Type(TypeSignature {
                name: "Duration".to_string(),
                alias,
                type_params: Vec::new(),
                underlying: TypeIdentifier::imported("time", "Duration"),
            })
        };
        assert_eq!(ty(false).to_string(), "type Duration time.Duration");
        assert_eq!(ty(true).to_string(), "type Duration = time.Duration");
        assert_eq!(ty(false).compare_key(), "Duration time.Duration");
        assert!(!ty(false).same_as(&ty(true)));
    }

    #[test]
    fn test_generic_function_carries_type_params() {
        let export = Export::Func(FuncSignature {
            name: "Map".to_string(),
            receiver: None,
            type_params: ["T", "U"]
                .into_iter()
                .map(|name| TypeParam {
                    name: name.to_string(),
                    constraint: vec![TypeTerm::new(TypeIdentifier::local("any"))],
                })
                .collect(),
            sig: FuncType {
                params: vec![TypeIdentifier::slice(TypeIdentifier::local("T"))],
                results: vec![TypeIdentifier::slice(TypeIdentifier::local("U"))],
            },
        });
        assert_eq!(export.to_string(), "func Map[T any, U any]([]T) []U");
        assert_eq!(export.compare_key(), "Map[T any|,U any|,] func([]T,)([]U,)");
    }
}
