use super::models::User;
use crate::error::Result;
use crate::serializers::SerializerClass;
use serde_json::{json, Value};

pub const USER_SERIALIZER: SerializerClass<User> = SerializerClass::new("UserSerializer", user_representation);

fn user_representation(user: &User) -> Result<Value> {
    Ok(json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "is_active": user.is_active,
        "date_joined": user.date_joined.to_rfc3339(),
    }))
}
