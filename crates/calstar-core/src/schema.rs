//! Table names and the foreign-key rule table.
//!
//! Every reference between tables is declared exactly once here, together
//! with what happens to the referencing rows when the referenced row is
//! deleted. Migrations derive their `ON DELETE` clauses from these rules and
//! [`crate::repo`]'s delete routine walks them to apply the policy inside the
//! deleting transaction.

use sea_orm::sea_query::ForeignKeyAction;

pub const DEPARTMENTS: &str = "departments";
pub const PROFESSORS: &str = "professors";
pub const COURSES: &str = "courses";
pub const COURSE_OFFERINGS: &str = "course_offerings";
pub const TAGS: &str = "tags";
pub const COURSE_TAGS: &str = "course_tags";
pub const RESOURCES: &str = "resources";
pub const USERS: &str = "users";
pub const ROLES: &str = "roles";
pub const USER_ROLES: &str = "user_roles";
pub const REVIEWS: &str = "reviews";

/// Every table, parents before children.
pub const TABLES: &[&str] = &[
    DEPARTMENTS,
    PROFESSORS,
    COURSES,
    COURSE_OFFERINGS,
    TAGS,
    COURSE_TAGS,
    USERS,
    ROLES,
    USER_ROLES,
    RESOURCES,
    REVIEWS,
];

/// What happens to referencing rows when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Delete the referencing rows too (and, recursively, their dependents).
    Cascade,
    /// Keep the referencing rows and clear the reference.
    SetNull,
}

impl OnDelete {
    pub fn action(self) -> ForeignKeyAction {
        match self {
            OnDelete::Cascade => ForeignKeyAction::Cascade,
            OnDelete::SetNull => ForeignKeyAction::SetNull,
        }
    }
}

/// `child.column` references `parent.id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyRule {
    pub name: &'static str,
    pub child: &'static str,
    pub column: &'static str,
    pub parent: &'static str,
    pub on_delete: OnDelete,
}

const fn rule(
    name: &'static str,
    child: &'static str,
    column: &'static str,
    parent: &'static str,
    on_delete: OnDelete,
) -> ForeignKeyRule {
    ForeignKeyRule {
        name,
        child,
        column,
        parent,
        on_delete,
    }
}

pub const PROFESSOR_DEPARTMENT: ForeignKeyRule = rule(
    "fk_professors_department",
    PROFESSORS,
    "department_id",
    DEPARTMENTS,
    OnDelete::SetNull,
);
pub const COURSE_DEPARTMENT: ForeignKeyRule = rule(
    "fk_courses_department",
    COURSES,
    "department_id",
    DEPARTMENTS,
    OnDelete::Cascade,
);
pub const OFFERING_COURSE: ForeignKeyRule = rule(
    "fk_course_offerings_course",
    COURSE_OFFERINGS,
    "course_id",
    COURSES,
    OnDelete::Cascade,
);
pub const OFFERING_PROFESSOR: ForeignKeyRule = rule(
    "fk_course_offerings_professor",
    COURSE_OFFERINGS,
    "professor_id",
    PROFESSORS,
    OnDelete::Cascade,
);
pub const COURSE_TAG_COURSE: ForeignKeyRule = rule(
    "fk_course_tags_course",
    COURSE_TAGS,
    "course_id",
    COURSES,
    OnDelete::Cascade,
);
pub const COURSE_TAG_TAG: ForeignKeyRule = rule(
    "fk_course_tags_tag",
    COURSE_TAGS,
    "tag_id",
    TAGS,
    OnDelete::Cascade,
);
pub const RESOURCE_OFFERING: ForeignKeyRule = rule(
    "fk_resources_course_offering",
    RESOURCES,
    "course_offering_id",
    COURSE_OFFERINGS,
    OnDelete::Cascade,
);
pub const RESOURCE_USER: ForeignKeyRule = rule(
    "fk_resources_user",
    RESOURCES,
    "user_id",
    USERS,
    OnDelete::Cascade,
);
pub const USER_ROLE_USER: ForeignKeyRule = rule(
    "fk_user_roles_user",
    USER_ROLES,
    "user_id",
    USERS,
    OnDelete::Cascade,
);
pub const USER_ROLE_ROLE: ForeignKeyRule = rule(
    "fk_user_roles_role",
    USER_ROLES,
    "role_id",
    ROLES,
    OnDelete::Cascade,
);
pub const REVIEW_OFFERING: ForeignKeyRule = rule(
    "fk_reviews_course_offering",
    REVIEWS,
    "course_offering_id",
    COURSE_OFFERINGS,
    OnDelete::Cascade,
);
pub const REVIEW_PROFESSOR: ForeignKeyRule = rule(
    "fk_reviews_professor",
    REVIEWS,
    "professor_id",
    PROFESSORS,
    OnDelete::Cascade,
);

pub const FOREIGN_KEYS: &[ForeignKeyRule] = &[
    PROFESSOR_DEPARTMENT,
    COURSE_DEPARTMENT,
    OFFERING_COURSE,
    OFFERING_PROFESSOR,
    COURSE_TAG_COURSE,
    COURSE_TAG_TAG,
    RESOURCE_OFFERING,
    RESOURCE_USER,
    USER_ROLE_USER,
    USER_ROLE_ROLE,
    REVIEW_OFFERING,
    REVIEW_PROFESSOR,
];

/// Rules whose referenced table is `parent`.
pub fn referencing(parent: &str) -> impl Iterator<Item = &'static ForeignKeyRule> + '_ {
    FOREIGN_KEYS.iter().filter(move |rule| rule.parent == parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_only_name_known_tables() {
        for rule in FOREIGN_KEYS {
            assert!(TABLES.contains(&rule.child), "{}", rule.name);
            assert!(TABLES.contains(&rule.parent), "{}", rule.name);
        }
    }

    #[test]
    fn parents_come_before_children() {
        let position = |t: &str| TABLES.iter().position(|x| *x == t).unwrap();
        for rule in FOREIGN_KEYS {
            assert!(position(rule.parent) < position(rule.child), "{}", rule.name);
        }
    }

    #[test]
    fn department_delete_nulls_professors_and_cascades_courses() {
        let rules: Vec<_> = referencing(DEPARTMENTS).collect();
        assert_eq!(rules.len(), 2);
        assert!(rules.contains(&&PROFESSOR_DEPARTMENT));
        assert!(rules.contains(&&COURSE_DEPARTMENT));
        assert_eq!(PROFESSOR_DEPARTMENT.on_delete, OnDelete::SetNull);
        assert_eq!(COURSE_DEPARTMENT.on_delete, OnDelete::Cascade);
    }

    #[test]
    fn professor_department_is_the_only_nullable_reference() {
        let set_null: Vec<_> = FOREIGN_KEYS
            .iter()
            .filter(|r| r.on_delete == OnDelete::SetNull)
            .collect();
        assert_eq!(set_null, vec![&PROFESSOR_DEPARTMENT]);
    }

    #[test]
    fn constraint_names_are_unique() {
        let mut names: Vec<_> = FOREIGN_KEYS.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FOREIGN_KEYS.len());
    }
}
