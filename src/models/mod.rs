mod chat;
mod entity;
mod message;
mod user;
mod user_chat_link;

pub use chat::{Chat, NewChat};
pub use entity::{Entity, EntityKind, IdentityKey, Insertable};
pub use message::{Message, NewMessage};
pub use user::{NewUser, User};
pub use user_chat_link::UserChatLink;
