//! Diesel schema for board lists and tasks.

diesel::table! {
    /// Board columns belonging to a project.
    board_lists (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Display title.
        #[max_length = 150]
        title -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tasks placed in board lists.
    tasks (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Owning project, used to scope list queries.
        project_id -> Int8,
        /// List currently holding the task.
        list_id -> Int8,
        /// Display title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// HTML-safe slug, set after insert.
        #[max_length = 1024]
        slug -> Nullable<Varchar>,
        /// Dense 1-based position within the list.
        sort_order -> Int4,
        /// Archive flag.
        is_archived -> Bool,
        /// Creating user.
        created_by -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> board_lists (list_id));
diesel::allow_tables_to_appear_in_same_query!(board_lists, tasks);
