//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep in step with the migrations; `diesel print-schema` regenerates this
//! file from a migrated database.

diesel::table! {
    users (id) {
        id -> Uuid,
        #[max_length = 100]
        name -> Varchar,
        #[max_length = 32]
        grade -> Varchar,
        birthday -> Nullable<Date>,
        #[max_length = 255]
        auth_subject -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    user_results (id) {
        id -> Int8,
        user_id -> Uuid,
        date -> Date,
        long_jump_cm -> Float8,
        fifty_meter_run_ms -> Float8,
        spider_ms -> Float8,
        eight_shape_run_count -> Float8,
        ball_throw_cm -> Float8,
        twenty_five_meter_run -> Nullable<Float8>,
        surface -> Nullable<Int2>,
        test_format -> Nullable<Int2>,
    }
}

diesel::table! {
    /// Average and maximum reference values, one row per kind and grade.
    cohort_benchmarks (id) {
        id -> Int8,
        #[max_length = 16]
        kind -> Varchar,
        #[max_length = 32]
        grade -> Varchar,
        long_jump_cm -> Float8,
        fifty_meter_run_ms -> Float8,
        spider_ms -> Float8,
        eight_shape_run_count -> Float8,
        ball_throw_cm -> Float8,
        total_score -> Nullable<Float8>,
    }
}

diesel::table! {
    trainings (id) {
        id -> Int8,
        training_type -> Int2,
        title -> Text,
        image_path -> Nullable<Text>,
        description -> Text,
        instructions -> Nullable<Text>,
        series_name -> Nullable<Text>,
        series_number -> Nullable<Int4>,
        page_number -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    user_training_results (id) {
        id -> Int8,
        user_id -> Uuid,
        training_id -> Int8,
        date -> Date,
        achievement_level -> Int2,
        comment -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(user_results -> users (user_id));
diesel::joinable!(user_training_results -> users (user_id));
diesel::joinable!(user_training_results -> trainings (training_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_results,
    cohort_benchmarks,
    trainings,
    user_training_results,
);
