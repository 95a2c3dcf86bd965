//! Diesel schema for workspaces, memberships, projects, stars, and recents.

diesel::table! {
    /// Workspaces grouping projects and members.
    workspaces (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Display name.
        #[max_length = 150]
        name -> Varchar,
        /// URL slug, set after insert.
        #[max_length = 255]
        slug -> Nullable<Varchar>,
        /// Owning user.
        owner_id -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Workspace membership rows.
    team_members (workspace_id, user_id) {
        /// Workspace identifier.
        workspace_id -> Int8,
        /// Member user identifier.
        user_id -> Int8,
        /// Member role (`admin` or `member`).
        #[max_length = 20]
        role -> Varchar,
        /// User who added this member.
        added_by -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects owned by a workspace.
    projects (id) {
        /// Store-assigned identifier.
        id -> Int8,
        /// Owning workspace.
        workspace_id -> Int8,
        /// Display title.
        #[max_length = 150]
        title -> Varchar,
        /// URL slug, set after insert.
        #[max_length = 255]
        slug -> Nullable<Varchar>,
        /// Visibility flag.
        is_private -> Bool,
        /// Owning user.
        owner_id -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user project stars.
    starred_projects (user_id, project_id) {
        /// User who starred the project.
        user_id -> Int8,
        /// Starred project.
        project_id -> Int8,
    }
}

diesel::table! {
    /// Last time each user opened a project.
    recent_projects (user_id, project_id) {
        /// User who opened the project.
        user_id -> Int8,
        /// Opened project.
        project_id -> Int8,
        /// Most recent open.
        opened_at -> Timestamptz,
    }
}

diesel::joinable!(recent_projects -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(
    workspaces,
    team_members,
    projects,
    starred_projects,
    recent_projects
);
