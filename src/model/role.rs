#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Reception = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Reception),
            3 => Some(Role::Employee),
            _ => None,
        }
    }
}
