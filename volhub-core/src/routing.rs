//! Role-gated screen map
//!
//! The resolved role decides which screens are reachable. Matching is
//! exhaustive so a new role forces a decision for every screen.

use crate::profile::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Profile,
    Events,
    EventDetails,
    MyRegistrations,
    ManageEvents,
    CreateEvent,
    AdminPanel,
    Register,
}

impl Screen {
    pub const ALL: [Screen; 9] = [
        Screen::Home,
        Screen::Profile,
        Screen::Events,
        Screen::EventDetails,
        Screen::MyRegistrations,
        Screen::ManageEvents,
        Screen::CreateEvent,
        Screen::AdminPanel,
        Screen::Register,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Screen::Home => "/",
            Screen::Profile => "/profile",
            Screen::Events => "/events",
            Screen::EventDetails => "/events/:id",
            Screen::MyRegistrations => "/my-registrations",
            Screen::ManageEvents => "/manage-events",
            Screen::CreateEvent => "/create-event",
            Screen::AdminPanel => "/admin",
            Screen::Register => "/register",
        }
    }

    pub fn accessible_by(&self, role: Role) -> bool {
        match self {
            Screen::Home | Screen::Profile | Screen::Events | Screen::EventDetails
            | Screen::Register => true,
            Screen::MyRegistrations => match role {
                Role::Volunteer => true,
                Role::Organizer => false,
                Role::Admin => true,
            },
            Screen::ManageEvents | Screen::CreateEvent => match role {
                Role::Volunteer => false,
                Role::Organizer => true,
                Role::Admin => true,
            },
            Screen::AdminPanel => match role {
                Role::Volunteer => false,
                Role::Organizer => false,
                Role::Admin => true,
            },
        }
    }
}

/// The set of screens reachable for a role
pub fn screens_for(role: Role) -> Vec<Screen> {
    Screen::ALL
        .into_iter()
        .filter(|s| s.accessible_by(role))
        .collect()
}
