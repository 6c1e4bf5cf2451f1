//! Response-envelope normalization.
//!
//! The backend answers list and detail endpoints either with the bare payload or with
//! the payload wrapped in a `data` envelope. These functions are applied once, at the
//! service boundary, so nothing past it deals with the raw shapes.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::masjid::MasjidMember;
use crate::permissions::{MemberRole, Permission};
use crate::user::{MasjidAssignment, User};

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Empty response body")]
    Empty,
}

/// Accepts `[...]` or `{ "data": [...] }`. Any other shape yields an empty list.
pub fn normalize_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, EnvelopeError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    items
        .into_iter()
        .map(|item| decode(canonical_id(item)))
        .collect()
}

/// Accepts `{ "data": {...} }` or the bare object.
pub fn normalize_object<T: DeserializeOwned>(body: Value) -> Result<T, EnvelopeError> {
    match body {
        Value::Null => Err(EnvelopeError::Empty),
        Value::Object(mut map) => {
            let inner = match map.remove("data") {
                Some(data) if !data.is_null() => data,
                _ => Value::Object(map),
            };
            decode(canonical_id(inner))
        }
        other => decode(other),
    }
}

/// Normalizes the user returned by create/update calls.
///
/// Accepts `{ "data": { "user": {...}, "masjid_assignment": {...} } }`, merging the
/// assignment into the user, and otherwise falls back to `normalize_object`.
pub fn normalize_user_write(body: Value) -> Result<User, EnvelopeError> {
    if let Some(data) = body.get("data").and_then(Value::as_object) {
        if let Some(user) = data.get("user") {
            let mut user: User = decode(canonical_id(user.clone()))?;
            if let Some(assignment) = data.get("masjid_assignment").filter(|v| !v.is_null()) {
                let assignment: MasjidAssignment = decode(assignment.clone())?;
                user.masjid_assignment = Some(assignment);
            }
            return Ok(user);
        }
    }
    normalize_object(body)
}

/// Normalizes the member list of a masjid.
///
/// Accepts `[...]`, `{ "data": [...] }` and `{ "data": { "members": [...] } }`. Entries
/// may use snake_case or camelCase keys, a populated `userId` object, lowercase roles,
/// and permissions as either a list of names or an object of booleans. Entries without
/// a user id or a recognizable role are dropped.
pub fn normalize_members(body: Value) -> Vec<MasjidMember> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(Value::Object(mut data)) => match data.remove("members") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(member_from_map)
        .collect()
}

fn member_from_map(map: &Map<String, Value>) -> Option<MasjidMember> {
    // A populated reference carries the user's own fields.
    let populated = ["user_id", "userId", "user"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_object));

    let user_id = match populated {
        Some(user) => first_string(user, &["id", "_id"]),
        None => first_string(map, &["user_id", "userId"]),
    }?;
    let role = first_string(map, &["role"]).and_then(|r| MemberRole::parse(&r))?;

    let user_name = first_string(map, &["user_name", "userName", "name"])
        .or_else(|| populated.and_then(|u| first_string(u, &["name"])))
        .unwrap_or_default();
    let user_email = first_string(map, &["user_email", "userEmail", "email"])
        .or_else(|| populated.and_then(|u| first_string(u, &["email"])))
        .unwrap_or_default();

    let permissions = match map.get("permissions") {
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .filter_map(Permission::parse)
            .collect(),
        Some(Value::Object(flags)) => Permission::ALL
            .into_iter()
            .filter(|p| flags.get(p.as_str()) == Some(&Value::Bool(true)))
            .collect(),
        _ => Vec::new(),
    };

    let assigned_at = first_string(map, &["assigned_at", "assignedAt", "created_at", "createdAt"])
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|d| d.with_timezone(&Utc));

    Some(MasjidMember {
        id: first_string(map, &["id", "_id"]).unwrap_or_else(|| user_id.clone()),
        user_id,
        user_name,
        user_email,
        role,
        permissions,
        assigned_at,
    })
}

fn first_string(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Copies `_id` into `id` when only the former is present.
fn canonical_id(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            if !map.contains_key("id") {
                if let Some(Value::String(raw)) = map.get("_id").cloned() {
                    map.insert("id".to_string(), Value::String(raw));
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, EnvelopeError> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::masjid::Masjid;
    use serde_json::json;

    fn masjid_json(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Masjid {id}"),
            "is_active": true,
            "created_at": "2024-05-01T08:00:00Z",
            "updated_at": "2024-05-02T08:00:00Z"
        })
    }

    #[test]
    fn test_list_bare_and_wrapped_are_equivalent() {
        let bare: Vec<Masjid> = normalize_list(json!([masjid_json("a"), masjid_json("b")])).unwrap();
        let wrapped: Vec<Masjid> =
            normalize_list(json!({ "data": [masjid_json("a"), masjid_json("b")] })).unwrap();

        assert_eq!(bare, wrapped);
        assert_eq!(bare.len(), 2);
    }

    #[test]
    fn test_list_unknown_shape_is_empty() {
        let list: Vec<Masjid> = normalize_list(json!({ "items": [] })).unwrap();
        assert!(list.is_empty());

        let list: Vec<Masjid> = normalize_list(json!("nope")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_list_malformed_entry_is_an_error() {
        let result: Result<Vec<Masjid>, _> = normalize_list(json!([{ "id": "x" }]));
        assert!(matches!(result, Err(EnvelopeError::Malformed(_))));
    }

    #[test]
    fn test_list_accepts_underscore_id() {
        let mut raw = masjid_json("ignored");
        raw.as_object_mut().unwrap().remove("id");
        raw["_id"] = json!("mongo-1");

        let list: Vec<Masjid> = normalize_list(json!([raw])).unwrap();
        assert_eq!(list[0].id, "mongo-1");
    }

    #[test]
    fn test_object_bare_and_wrapped() {
        let bare: Masjid = normalize_object(masjid_json("a")).unwrap();
        let wrapped: Masjid = normalize_object(json!({ "data": masjid_json("a") })).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn test_object_null_body() {
        let result: Result<Masjid, _> = normalize_object(Value::Null);
        assert!(matches!(result, Err(EnvelopeError::Empty)));
    }

    #[test]
    fn test_user_write_merges_assignment() {
        let body = json!({
            "data": {
                "user": {
                    "id": "u1",
                    "name": "Yusuf",
                    "email": "yusuf@example.com",
                    "created_at": "2024-01-01T00:00:00Z"
                },
                "masjid_assignment": {
                    "masjid_id": "m1",
                    "role": "imam",
                    "permissions": { "can_answer_questions": true }
                }
            }
        });

        let user = normalize_user_write(body).unwrap();
        let assignment = user.masjid_assignment.unwrap();
        assert_eq!(assignment.masjid_id, "m1");
        assert_eq!(assignment.role, MemberRole::Imam);
        assert!(assignment.permissions.can_answer_questions);
    }

    #[test]
    fn test_user_write_bare_user() {
        let user = normalize_user_write(json!({
            "id": "u2",
            "name": "Maryam",
            "email": "maryam@example.com",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.id, "u2");
    }

    #[test]
    fn test_members_nested_backend_format() {
        let body = json!({
            "data": {
                "members": [{
                    "_id": "a1",
                    "userId": "u1",
                    "userName": "Bilal",
                    "userEmail": "bilal@example.com",
                    "role": "admin",
                    "permissions": { "can_view_questions": true, "can_create_events": false },
                    "assignedAt": "2024-02-03T04:05:06Z"
                }]
            }
        });

        let members = normalize_members(body);
        assert_eq!(members.len(), 1);
        let member = &members[0];
        assert_eq!(member.id, "a1");
        assert_eq!(member.user_id, "u1");
        assert_eq!(member.user_name, "Bilal");
        assert_eq!(member.role, MemberRole::Admin);
        assert_eq!(member.permissions, vec![Permission::CanViewQuestions]);
        assert!(member.assigned_at.is_some());
    }

    #[test]
    fn test_members_canonical_list_format() {
        let body = json!([{
            "id": "a2",
            "user_id": "u2",
            "user_name": "Khadija",
            "user_email": "khadija@example.com",
            "role": "Imam",
            "permissions": ["can_answer_questions", "not_a_flag"],
            "assigned_at": "2024-02-03T04:05:06Z"
        }]);

        let members = normalize_members(body);
        assert_eq!(members[0].role, MemberRole::Imam);
        assert_eq!(members[0].permissions, vec![Permission::CanAnswerQuestions]);
    }

    #[test]
    fn test_members_populated_user_reference() {
        let body = json!({
            "data": [{
                "userId": { "_id": "u3", "name": "Hamza", "email": "hamza@example.com" },
                "role": "imam",
                "createdAt": "2024-02-03T04:05:06Z"
            }]
        });

        let members = normalize_members(body);
        assert_eq!(members[0].user_id, "u3");
        assert_eq!(members[0].id, "u3");
        assert_eq!(members[0].user_name, "Hamza");
        assert_eq!(members[0].user_email, "hamza@example.com");
    }

    #[test]
    fn test_members_drop_unusable_entries() {
        let body = json!([
            { "userId": "u1" },
            { "role": "admin" },
            "garbage"
        ]);

        assert!(normalize_members(body).is_empty());
    }
}
