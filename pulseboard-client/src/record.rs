use pulseboard_common::model::{
    Id, ValidationError,
    comment::Comment,
    post::Post,
    required,
    user::User,
};
use serde::{Deserialize, de::DeserializeOwned};
use std::collections::HashSet;

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub(crate) struct UserRecord {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostRecord {
    pub id: Option<u64>,
    pub user_id: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentRecord {
    pub id: Option<u64>,
    pub post_id: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub body: Option<String>,
}

/// Model types that the collection endpoints return.
pub(crate) trait Record: Sized {
    type Raw: DeserializeOwned;
    const ENTITY: &'static str;

    fn from_raw(raw: Self::Raw) -> Result<Self, ValidationError>;

    fn raw_id(&self) -> u64;
}

impl Record for User {
    type Raw = UserRecord;
    const ENTITY: &'static str = "User";

    fn from_raw(raw: Self::Raw) -> Result<Self, ValidationError> {
        Self::try_from(raw)
    }

    fn raw_id(&self) -> u64 {
        self.id.get()
    }
}

impl Record for Post {
    type Raw = PostRecord;
    const ENTITY: &'static str = "Post";

    fn from_raw(raw: Self::Raw) -> Result<Self, ValidationError> {
        Self::try_from(raw)
    }

    fn raw_id(&self) -> u64 {
        self.id.get()
    }
}

impl Record for Comment {
    type Raw = CommentRecord;
    const ENTITY: &'static str = "Comment";

    fn from_raw(raw: Self::Raw) -> Result<Self, ValidationError> {
        Self::try_from(raw)
    }

    fn raw_id(&self) -> u64 {
        self.id.get()
    }
}

impl TryFrom<UserRecord> for User {
    type Error = ValidationError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Id::new(required(value.id, Self::ENTITY, "id")?),
            name: required(value.name, Self::ENTITY, "name")?,
            username: required(value.username, Self::ENTITY, "username")?,
            email: required(value.email, Self::ENTITY, "email")?,
        })
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = ValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Id::new(required(value.id, Self::ENTITY, "id")?),
            user_id: Id::new(required(value.user_id, Self::ENTITY, "userId")?),
            title: required(value.title, Self::ENTITY, "title")?,
            body: required(value.body, Self::ENTITY, "body")?,
        })
    }
}

impl TryFrom<CommentRecord> for Comment {
    type Error = ValidationError;

    fn try_from(value: CommentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Id::new(required(value.id, Self::ENTITY, "id")?),
            post_id: Id::new(required(value.post_id, Self::ENTITY, "postId")?),
            name: required(value.name, Self::ENTITY, "name")?,
            email: required(value.email, Self::ENTITY, "email")?,
            body: required(value.body, Self::ENTITY, "body")?,
        })
    }
}

/// Validates every record of a collection and rejects repeated ids.
pub(crate) fn validate_collection<T: Record>(raw: Vec<T::Raw>) -> Result<Vec<T>, ValidationError> {
    let mut seen = HashSet::with_capacity(raw.len());

    raw.into_iter()
        .map(|record| {
            let item = T::from_raw(record)?;
            if seen.insert(item.raw_id()) {
                Ok(item)
            } else {
                Err(ValidationError::DuplicateId {
                    entity: T::ENTITY,
                    id: item.raw_id(),
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::record::{CommentRecord, PostRecord, UserRecord, validate_collection};
    use pulseboard_common::model::{
        ValidationError, comment::Comment, post::Post, user::User,
    };

    fn user_record(id: u64) -> UserRecord {
        UserRecord {
            id: Some(id),
            name: Some("Leanne Graham".to_owned()),
            username: Some("Bret".to_owned()),
            email: Some("Sincere@april.biz".to_owned()),
        }
    }

    #[test]
    fn parses_source_shapes() {
        let raw: Vec<PostRecord> = serde_json::from_str(
            r#"[{"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit"}]"#,
        )
        .unwrap();
        let posts = validate_collection::<Post>(raw).unwrap();

        assert_eq!(posts[0].user_id.get(), 1);
        assert_eq!(posts[0].title, "sunt aut facere");

        let raw: Vec<CommentRecord> = serde_json::from_str(
            r#"[{"postId": 1, "id": 3, "name": "odio", "email": "Nikita@garfield.biz", "body": "quia"}]"#,
        )
        .unwrap();
        let comments = validate_collection::<Comment>(raw).unwrap();

        assert_eq!(comments[0].post_id.get(), 1);
        assert_eq!(comments[0].id.get(), 3);
    }

    #[test]
    fn ignores_unknown_fields() {
        let raw: Vec<UserRecord> = serde_json::from_str(
            r#"[{"id": 1, "name": "Leanne Graham", "username": "Bret",
                "email": "Sincere@april.biz", "phone": "1-770-736-8031", "address": {}}]"#,
        )
        .unwrap();

        assert_eq!(validate_collection::<User>(raw).unwrap()[0].username, "Bret");
    }

    #[test]
    fn rejects_missing_or_null_fields() {
        let missing = UserRecord {
            email: None,
            ..user_record(1)
        };
        assert_eq!(
            validate_collection::<User>(vec![user_record(2), missing]),
            Err(ValidationError::MissingField {
                entity: "User",
                field: "email"
            })
        );

        let raw: Vec<PostRecord> =
            serde_json::from_str(r#"[{"id": 1, "userId": null, "title": "", "body": ""}]"#)
                .unwrap();
        assert_eq!(
            validate_collection::<Post>(raw),
            Err(ValidationError::MissingField {
                entity: "Post",
                field: "userId"
            })
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        assert_eq!(
            validate_collection::<User>(vec![user_record(1), user_record(2), user_record(1)]),
            Err(ValidationError::DuplicateId {
                entity: "User",
                id: 1
            })
        );
    }
}
