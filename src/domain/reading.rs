//! Reading-club list items
//!
//! Only the fields the list screens need; the full API payloads carry more.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::collections::Identified;

/// Which paginated list a screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Notifications,
    Rooms,
    Groups,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFilter {
    #[default]
    All,
    Mentions,
    Replies,
    Invites,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

impl Identified for Notification {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Reading room lifecycle, also used as the "my rooms" filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Active,
    Upcoming,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: RoomStatus,
}

impl Identified for Room {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub member_count: u32,
}

impl Identified for Group {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("notifications", ListKind::Notifications)]
    #[case("Rooms", ListKind::Rooms)]
    #[case("GROUPS", ListKind::Groups)]
    fn test_list_kind_from_str(#[case] input: &str, #[case] expected: ListKind) {
        assert_eq!(ListKind::from_str(input), Ok(expected));
    }

    #[test]
    fn test_filter_display_round_trip() {
        assert_eq!(NotificationFilter::Mentions.to_string(), "mentions");
        assert_eq!(
            NotificationFilter::from_str("invites"),
            Ok(NotificationFilter::Invites)
        );
        assert_eq!(RoomStatus::from_str("upcoming"), Ok(RoomStatus::Upcoming));
        assert!(RoomStatus::from_str("archived").is_err());
    }

    #[test]
    fn test_room_deserialize_defaults_status() {
        let room: Room =
            serde_json::from_str(r#"{"id":"r1","title":"Middlemarch"}"#).expect("valid room");
        assert_eq!(room.status, RoomStatus::Active);
        assert_eq!(room.id(), "r1");
    }
}
