mod attributes;
mod authorization;
mod content_page;
mod content_type;
mod node;
mod user_item;


pub use attributes::{AttributeBag, AttributeValue, Detail, DetailCollection, ValueKind};
pub use authorization::{AuthorizedRole, Permission, Principal, SimplePrincipal, EVERYONE_ROLE};
pub use content_page::{ContentPage, ContentPageBuilder, CONTENT_PAGE_TYPE};
pub use content_type::{
    ContentType, PropertyDecl, TypeDefinition, DEFAULT_PART_TEMPLATE_URL, DEFAULT_TEMPLATE_URL,
};
pub use node::{ContentNode, CreationPosition, NodeKey, NodeState, Publication};
pub use user_item::{UserItem, UserItemBuilder, ROLES_COLLECTION, USER_ITEM_TYPE};
