use std::collections::BTreeMap;

/// user -> granted role names, in grant order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserBindings {
    users: BTreeMap<String, Vec<String>>,
}

impl UserBindings {
    pub fn contains_user(&self, user: &str) -> bool { self.users.contains_key(user) }

    pub fn roles_of(&self, user: &str) -> Option<&[String]> { self.users.get(user).map(Vec::as_slice) }

    /// Users holding `role`, sorted by user name.
    pub fn users_with(&self, role: &str) -> Vec<String> {
        self.users.iter().filter(|(_, roles)| roles.iter().any(|r| r == role)).map(|(u, _)| u.clone()).collect()
    }

    pub fn insert_user(&mut self, user: &str, roles: &[String]) {
        let entry = self.users.entry(user.to_string()).or_default();
        entry.clear();
        push_unique(entry, roles);
    }

    pub fn remove_user(&mut self, user: &str) -> bool { self.users.remove(user).is_some() }

    pub fn grant(&mut self, user: &str, roles: &[String]) {
        if let Some(entry) = self.users.get_mut(user) { push_unique(entry, roles); }
    }

    pub fn revoke(&mut self, user: &str, roles: &[String]) {
        if let Some(entry) = self.users.get_mut(user) { entry.retain(|r| !roles.contains(r)); }
    }

    /// Drop `role` from every user. Users keep their entry even when left with no roles.
    pub fn scrub_role(&mut self, role: &str) {
        for roles in self.users.values_mut() { roles.retain(|r| r != role); }
    }
}

fn push_unique(entry: &mut Vec<String>, roles: &[String]) {
    for r in roles {
        if !entry.contains(r) { entry.push(r.clone()); }
    }
}
