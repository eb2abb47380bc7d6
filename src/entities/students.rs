use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub enrollment_number: String,

    pub student_name: String,

    /// Lower-cased login identifier
    #[sea_orm(unique)]
    pub email: String,

    pub department: String,

    pub course: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Filename of the uploaded photo inside the upload directory
    pub photo_path: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
