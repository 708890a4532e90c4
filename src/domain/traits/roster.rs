use std::sync::Arc;

use crate::domain::entities::{Channel, Member, Role};

/// Roster trait - lookup contract a server offers for resolving ids
pub trait Roster {
    /// Member with the given user id
    fn get_member(&self, id: &str) -> Option<Arc<Member>>;

    /// Channel with the given id
    fn get_channel(&self, id: &str) -> Option<Arc<Channel>>;

    /// All roles, in roster order
    fn roles(&self) -> Vec<Arc<Role>>;

    /// Role with the given id
    fn get_role(&self, id: &str) -> Option<Arc<Role>> {
        self.roles().into_iter().find(|role| role.id == id)
    }
}
