use sea_orm::prelude::DateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use entities::prelude::{Session, User};
use entities::user_local_model::UserModel;
use entities::{session, user};

pub async fn get_user_by_username<C: ConnectionTrait>(
    db: &C,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
}

pub async fn list_users<C: ConnectionTrait>(db: &C) -> Result<Vec<user::Model>, DbErr> {
    User::find().order_by_asc(user::Column::Username).all(db).await
}

pub async fn add_user<C: ConnectionTrait>(db: &C, user: UserModel) -> Result<user::Model, DbErr> {
    user.into_active_model().insert(db).await
}

pub async fn any_superuser<C: ConnectionTrait>(db: &C) -> Result<bool, DbErr> {
    Ok(User::find()
        .filter(user::Column::IsSuperuser.eq(true))
        .one(db)
        .await?
        .is_some())
}

pub async fn create_session<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    token: &str,
    now: DateTime,
) -> Result<session::Model, DbErr> {
    session::ActiveModel {
        token: ActiveValue::Set(token.to_string()),
        user_id: ActiveValue::Set(user_id),
        created: ActiveValue::Set(now),
    }
    .insert(db)
    .await
}

pub async fn user_for_session<C: ConnectionTrait>(
    db: &C,
    token: &str,
) -> Result<Option<user::Model>, DbErr> {
    let found = Session::find_by_id(token.to_string())
        .find_also_related(User)
        .one(db)
        .await?;
    Ok(found.and_then(|(_, user)| user))
}

pub async fn delete_session<C: ConnectionTrait>(db: &C, token: &str) -> Result<(), DbErr> {
    Session::delete_by_id(token.to_string()).exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;

    fn user_named(username: &str, staff: bool) -> UserModel {
        UserModel {
            username: username.to_string(),
            email: String::new(),
            password: "$pbkdf2-sha256$i=600000,l=32$salt$digest".to_string(),
            is_staff: staff,
            is_superuser: false,
            date_joined: chrono::Utc::now().naive_utc(),
        }
    }

    #[tokio::test]
    async fn sessions_resolve_to_their_user_until_deleted() {
        let db = test_db::connect().await;
        let user = add_user(&db, user_named("staff", true)).await.unwrap();
        create_session(&db, user.id, "token-1", chrono::Utc::now().naive_utc())
            .await
            .unwrap();

        let found = user_for_session(&db, "token-1").await.unwrap().unwrap();
        assert_eq!(found.username, "staff");
        assert!(user_for_session(&db, "other").await.unwrap().is_none());

        delete_session(&db, "token-1").await.unwrap();
        assert!(user_for_session(&db, "token-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let db = test_db::connect().await;
        add_user(&db, user_named("regular", false)).await.unwrap();
        assert!(add_user(&db, user_named("regular", false)).await.is_err());
        assert!(!any_superuser(&db).await.unwrap());
    }
}
