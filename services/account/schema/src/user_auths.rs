use sea_orm::entity::prelude::*;

/// Login credential for one authentication method of one user.
///
/// `identity_type` is `"email"` or `"wxapp"`; `identifier` is the email
/// address or the mini-program open-id and is unique within its type
/// partition. `credential` always holds a bcrypt hash — of the password
/// for email logins, of the WeChat session key for wxapp logins.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_auths")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub identity_type: String,
    pub identifier: String,
    pub credential: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
