//! Esquema Diesel (mantenido a mano). Reemplazable con `diesel print-schema`.
//! Debe coincidir columna a columna con `migrations/` y con `conformance::MANIFEST`.

diesel::table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        password -> Varchar,
        email -> Nullable<Varchar>,
        height_cm -> Nullable<Int4>,
        sex -> Nullable<Varchar>,
        dob -> Nullable<Date>,
    }
}

diesel::table! {
    food_and_beverages (id) {
        id -> Int4,
        name -> Text,
        human_unit -> Nullable<Text>,
        human_quantity -> Nullable<Float4>,
        standard_unit -> Nullable<Text>,
        standard_quantity -> Nullable<Float4>,
        calories -> Nullable<Float4>,
        fat_g -> Nullable<Float4>,
        protein_g -> Nullable<Float4>,
        carbs_g -> Nullable<Float4>,
        sugar_g -> Nullable<Float4>,
        fiber_g -> Nullable<Float4>,
        sodium_mg -> Nullable<Float4>,
    }
}

diesel::table! {
    consumption_log (id) {
        id -> Int4,
        user_id -> Int4,
        food_bev_id -> Int4,
        time_consumed_at -> Timestamptz,
        human_quantity -> Nullable<Float4>,
        standard_quantity -> Nullable<Float4>,
        unit_type -> Nullable<Text>,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int4,
        name -> Text,
        description -> Nullable<Text>,
        prep_time_min -> Nullable<Int4>,
        cook_time_min -> Nullable<Int4>,
        servings -> Nullable<Float4>,
        standard_quantity -> Nullable<Float4>,
        serving_description -> Nullable<Text>,
    }
}

diesel::table! {
    recipe_instructions (id) {
        id -> Int4,
        recipe_id -> Int4,
        step_number -> Int4,
        step_description -> Text,
    }
}

diesel::table! {
    recipe_ingredients (id) {
        id -> Int4,
        recipe_id -> Int4,
        food_bev_id -> Int4,
        #[sql_name = "order"]
        position -> Int4,
        human_quantity -> Nullable<Float4>,
        standard_quantity -> Nullable<Float4>,
        unit_type -> Nullable<Text>,
    }
}

diesel::table! {
    recipes_consumption (id) {
        id -> Int4,
        user_id -> Int4,
        recipe_id -> Int4,
        time_consumed_at -> Timestamptz,
        recipe_proportion -> Nullable<Float4>,
    }
}

diesel::table! {
    user_budget_data (id) {
        id -> Int4,
        user_id -> Int4,
        start_date -> Date,
        goal_weekly_weight_change_lb -> Nullable<Float4>,
        activity_level -> Nullable<Float4>,
        caloric_budget -> Nullable<Int4>,
    }
}

diesel::table! {
    user_metric_history (id) {
        id -> Int4,
        user_id -> Int4,
        observation_time -> Timestamptz,
        weight_kg -> Nullable<Float4>,
    }
}

diesel::table! {
    foods (id) {
        id -> Int4,
        fatsecret_food_id -> Text,
        food_name -> Text,
        brand_name -> Nullable<Text>,
        serving_id -> Nullable<Text>,
        serving_description -> Nullable<Text>,
        metric_serving_amount -> Nullable<Float4>,
        metric_serving_unit -> Nullable<Text>,
        calories -> Nullable<Float4>,
        fat_g -> Nullable<Float4>,
        protein_g -> Nullable<Float4>,
        carbs_g -> Nullable<Float4>,
        sugar_g -> Nullable<Float4>,
        fiber_g -> Nullable<Float4>,
        sodium_mg -> Nullable<Float4>,
        retrieved_at -> Timestamptz,
    }
}

diesel::joinable!(consumption_log -> users (user_id));
diesel::joinable!(consumption_log -> food_and_beverages (food_bev_id));
diesel::joinable!(recipe_instructions -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> food_and_beverages (food_bev_id));
diesel::joinable!(recipes_consumption -> users (user_id));
diesel::joinable!(recipes_consumption -> recipes (recipe_id));
diesel::joinable!(user_budget_data -> users (user_id));
diesel::joinable!(user_metric_history -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    food_and_beverages,
    consumption_log,
    recipes,
    recipe_instructions,
    recipe_ingredients,
    recipes_consumption,
    user_budget_data,
    user_metric_history,
    foods,
);
