use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ingredient_recipes::Entity")]
    IngredientRecipes,
}

impl Related<super::ingredient_recipes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IngredientRecipes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
