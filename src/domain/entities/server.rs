use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{Channel, ChannelKind, Member, Role};
use crate::domain::traits::Roster;

/// A server (guild) and its member, channel and role rosters.
///
/// The rosters sit behind locks so the owning cache can keep them in sync
/// while messages hold `Arc` handles to individual entries.
#[derive(Debug)]
pub struct Server {
    pub id: String,
    pub name: String,
    members: RwLock<HashMap<String, Arc<Member>>>,
    channels: RwLock<HashMap<String, Arc<Channel>>>,
    roles: RwLock<Vec<Arc<Role>>>,
}

impl Server {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            name: name.into(),
            members: RwLock::new(HashMap::new()),
            channels: RwLock::new(HashMap::new()),
            roles: RwLock::new(Vec::new()),
        })
    }

    /// Insert or replace a member, returning the shared handle
    pub fn add_member(&self, member: Member) -> Arc<Member> {
        let member = Arc::new(member);
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(member.id().to_string(), Arc::clone(&member));
        member
    }

    pub fn remove_member(&self, id: &str) -> Option<Arc<Member>> {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Create a channel owned by this server
    pub fn create_channel(
        self: &Arc<Self>,
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ChannelKind,
    ) -> Arc<Channel> {
        self.create_channel_with(id, name, kind, |channel| channel)
    }

    /// Create a channel, letting `configure` set optional fields such as the
    /// topic before it is shared
    pub fn create_channel_with(
        self: &Arc<Self>,
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ChannelKind,
        configure: impl FnOnce(Channel) -> Channel,
    ) -> Arc<Channel> {
        let channel = configure(Channel::in_server(Arc::downgrade(self), id, name, kind));
        let channel = Arc::new(channel);
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.id.clone(), Arc::clone(&channel));
        channel
    }

    pub fn remove_channel(&self, id: &str) -> Option<Arc<Channel>> {
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    /// Insert or replace a role, keeping the list ordered by position
    pub fn add_role(&self, role: Role) -> Arc<Role> {
        let role = Arc::new(role);
        let mut roles = self.roles.write().unwrap_or_else(PoisonError::into_inner);
        roles.retain(|r| r.id != role.id);
        roles.push(Arc::clone(&role));
        roles.sort_by_key(|r| r.position);
        role
    }

    pub fn remove_role(&self, id: &str) -> Option<Arc<Role>> {
        let mut roles = self.roles.write().unwrap_or_else(PoisonError::into_inner);
        let index = roles.iter().position(|r| r.id == id)?;
        Some(roles.remove(index))
    }

    pub fn member_count(&self) -> usize {
        self.members.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn channels(&self) -> Vec<Arc<Channel>> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

impl Roster for Server {
    fn get_member(&self, id: &str) -> Option<Arc<Member>> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn get_channel(&self, id: &str) -> Option<Arc<Channel>> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn roles(&self) -> Vec<Arc<Role>> {
        self.roles.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
