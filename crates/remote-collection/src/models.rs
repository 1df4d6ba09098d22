//! Collection Models
//!
//! Records as the servers return them, plus the drafts sent on create.

use serde::{Deserialize, Serialize};

use crate::client::GraphqlDocuments;
use crate::record::{Fields, Record};

/// Implements `Fields` for a struct whose listed members are all `String`
macro_rules! impl_fields {
    ($ty:ty { $($name:ident => $label:literal),+ $(,)? }) => {
        impl Fields for $ty {
            const FIELDS: &'static [crate::record::FieldSpec] = &[
                $(crate::record::FieldSpec { name: stringify!($name), label: $label }),+
            ];

            fn field(&self, name: &str) -> Option<&str> {
                match name {
                    $(stringify!($name) => Some(self.$name.as_str()),)+
                    _ => None,
                }
            }

            fn set_field(&mut self, name: &str, value: String) -> bool {
                match name {
                    $(stringify!($name) => {
                        self.$name = value;
                        true
                    })+
                    _ => false,
                }
            }
        }
    };
}

// ========================
// Todo (GraphQL)
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoDraft {
    pub name: String,
    pub description: String,
}

impl_fields!(Todo { name => "Name", description => "Description" });
impl_fields!(TodoDraft { name => "Name", description => "Description" });

impl Record for Todo {
    type Draft = TodoDraft;

    const RESOURCE: &'static str = "todos";
    const LABEL: &'static str = "Todo";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn from_draft(draft: &TodoDraft) -> Self {
        Self {
            id: None,
            name: draft.name.clone(),
            description: draft.description.clone(),
        }
    }
}

impl GraphqlDocuments for Todo {
    const LIST_QUERY: &'static str =
        "query ListTodos { listTodos { items { id name description } } }";
    const LIST_FIELD: &'static str = "listTodos";

    const CREATE_MUTATION: &'static str = "mutation CreateTodo($input: CreateTodoInput!) { \
         createTodo(input: $input) { id name description } }";
    const CREATE_FIELD: &'static str = "createTodo";

    const UPDATE_MUTATION: &'static str = "mutation UpdateTodo($input: UpdateTodoInput!) { \
         updateTodo(input: $input) { id name description } }";
    const UPDATE_FIELD: &'static str = "updateTodo";

    const DELETE_MUTATION: &'static str = "mutation DeleteTodo($input: DeleteTodoInput!) { \
         deleteTodo(input: $input) { id } }";
    const DELETE_FIELD: &'static str = "deleteTodo";
}

// ========================
// User (REST)
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
}

impl_fields!(User { username => "Username", email => "Email" });
impl_fields!(UserDraft { username => "Username", email => "Email" });

impl Record for User {
    type Draft = UserDraft;

    const RESOURCE: &'static str = "users";
    const LABEL: &'static str = "User";

    fn id(&self) -> Option<&str> {
        Some(self.id.as_str()).filter(|id| !id.is_empty())
    }

    fn from_draft(draft: &UserDraft) -> Self {
        Self {
            id: String::new(),
            username: draft.username.clone(),
            email: draft.email.clone(),
        }
    }
}

// ========================
// Product (REST)
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
}

impl_fields!(Product { name => "Name", description => "Description", price => "Price" });
impl_fields!(ProductDraft { name => "Name", description => "Description", price => "Price" });

impl Record for Product {
    type Draft = ProductDraft;

    const RESOURCE: &'static str = "products";
    const LABEL: &'static str = "Product";

    fn id(&self) -> Option<&str> {
        Some(self.id.as_str()).filter(|id| !id.is_empty())
    }

    fn from_draft(draft: &ProductDraft) -> Self {
        Self {
            id: String::new(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_round_through_names() {
        let mut product = Product::from_draft(&ProductDraft::default());
        assert!(product.set_field("price", "9.99".into()));
        assert!(!product.set_field("id", "p1".into()));
        assert_eq!(product.field("price"), Some("9.99"));
        assert_eq!(product.field("missing"), None);
        assert_eq!(product.id(), None);

        let labels: Vec<_> = Product::FIELDS.iter().map(|f| f.label).collect();
        assert_eq!(labels, ["Name", "Description", "Price"]);
    }

    #[test]
    fn test_missing_fields_treats_whitespace_as_empty() {
        let draft = UserDraft { username: "  ".into(), email: "a@x.com".into() };
        assert_eq!(draft.missing_fields(), vec!["username"]);
        assert!(TodoDraft { name: "n".into(), description: "d".into() }.missing_fields().is_empty());
    }

    #[test]
    fn test_todo_without_id_omits_it_on_the_wire() {
        let todo = Todo::from_draft(&TodoDraft { name: "n".into(), description: "d".into() });
        let json = serde_json::to_value(&todo).unwrap();
        assert!(json.get("id").is_none());

        let parsed: Todo = serde_json::from_str(r#"{"id":"t1","name":"n","description":"d"}"#).unwrap();
        assert_eq!(parsed.id(), Some("t1"));
    }
}
