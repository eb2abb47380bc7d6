use sea_orm::entity::prelude::*;

/// A filed complaint. The submitter columns are a snapshot of the student
/// at filing time and carry no foreign key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub enrollment_number: String,

    pub name: String,

    pub email: String,

    pub course: String,

    pub department: String,

    pub complaint_type: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
