use rusqlite::Connection;

use crate::{awdb::{DBResult, swallow_constraint_violation}, models};

/////*============== USER QUERIES ==============*/
impl<'a> TryFrom<&'a rusqlite::Row<'a>> for models::User {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            user_id: row.get("user_id")?,
            email: row.get("email")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Inserts a user, doing nothing if they're already there.
/// Returns `true` if it was newly added, false otherwise.
pub fn insert_user(connection: &Connection, user: &models::User) -> DBResult<bool> {
    log::trace!("[insert_user] Inserting user {} into Users...", user.user_id);

    let query_params = rusqlite::named_params! {
            ":user_id":    user.user_id,
            ":email":      user.email,
            ":created_at": user.created_at,
    };

    let inserted = connection
        .prepare(
            "INSERT INTO Users ( user_id,  email,  created_at)
             VALUES            (:user_id, :email, :created_at)",
        )?
        .execute(query_params)
        .map_or_else(swallow_constraint_violation, |_| Ok(true))?;

    if inserted {
        log::info!("User {} has been added to the database.", user.user_id);
    }

    Ok(inserted)
}

/// Returns the user with id `user_id`, if they exist.
pub fn query_user(connection: &Connection, user_id: &str) -> DBResult<Option<models::User>> {
    connection
        .prepare("SELECT * FROM Users WHERE user_id = :user_id")?
        .query(rusqlite::named_params! { ":user_id": user_id })?
        .next()?
        .map(|row| row.try_into())
        .transpose()
}

/// Gathers every registered user.
pub fn query_all_users(connection: &Connection) -> DBResult<Vec<models::User>> {
    log::trace!("[query_all_users] Querying all users.");

    let mut stmt = connection.prepare("SELECT * FROM Users ORDER BY user_id")?;
    let users = stmt
        .query_map([], |row| models::User::try_from(row))?
        .collect::<DBResult<Vec<models::User>>>()?;

    Ok(users)
}

/// Checks if the user is in the database.
pub fn user_exists(connection: &Connection, user_id: &str) -> DBResult<bool> {
    connection
        .prepare("SELECT 1 FROM Users WHERE user_id = :user_id")?
        .exists(rusqlite::named_params! { ":user_id": user_id })
}

/// Updates a user's email address.
pub fn update_email(connection: &Connection, user_id: &str, email: &str) -> DBResult<()> {
    connection
        .prepare("UPDATE Users SET email = :email WHERE user_id = :user_id")?
        .execute(rusqlite::named_params! { ":user_id": user_id, ":email": email })
        .inspect_err(|err| log::error!("[update_email] Could not update email for {user_id}: {err}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::awdb;

    #[test]
    fn insert_and_query() {
        let db = awdb::open_in_memory().unwrap();
        let user = models::User::new("alice", Some("alice@example.com"));

        assert!(insert_user(&db, &user).unwrap());
        assert!(!insert_user(&db, &user).unwrap());
        assert!(user_exists(&db, "alice").unwrap());
        assert!(!user_exists(&db, "bob").unwrap());

        let stored = query_user(&db, "alice").unwrap().unwrap();
        assert_eq!(stored.email.as_deref(), Some("alice@example.com"));
        assert!(query_user(&db, "bob").unwrap().is_none());
    }

    #[test]
    fn update_and_list() {
        let db = awdb::open_in_memory().unwrap();
        insert_user(&db, &models::User::new("bob", None)).unwrap();
        insert_user(&db, &models::User::new("alice", None)).unwrap();
        update_email(&db, "bob", "bob@example.com").unwrap();

        let users = query_all_users(&db).unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(ids, ["alice", "bob"]);
        assert_eq!(users[1].email.as_deref(), Some("bob@example.com"));
    }
}
