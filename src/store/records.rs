//! Fixed-schema Person and Project records.
//!
//! Plain CRUD over two static tables, with uniqueness constraints on the
//! human-readable fields. Unique violations surface as
//! [`ImportError::DuplicateName`].

use chrono::NaiveDate;
use sqlx::FromRow;

use crate::error::{ImportError, ImportResult};

use super::TableStore;

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub job_title: String,
    pub birthday: NaiveDate,
}

/// Fields for creating a [`Person`].
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub name: String,
    pub job_title: String,
    pub birthday: NaiveDate,
}

/// A project record.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub contractor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Fields for creating a [`Project`].
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub address: String,
    pub contractor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TableStore {
    /// Insert a new person, returning it with its assigned id.
    pub fn create_person(&self, new: &NewPerson) -> ImportResult<Person> {
        self.block_on(async {
            let result = sqlx::query(
                "INSERT INTO persons (name, job_title, birthday) VALUES (?, ?, ?)",
            )
            .bind(&new.name)
            .bind(&new.job_title)
            .bind(new.birthday)
            .execute(self.pool())
            .await
            .map_err(|e| ImportError::from_sqlx(e, &new.name))?;

            Ok(Person {
                id: result.last_insert_rowid(),
                name: new.name.clone(),
                job_title: new.job_title.clone(),
                birthday: new.birthday,
            })
        })
    }

    /// Fetch a person by id.
    pub fn get_person(&self, id: i64) -> ImportResult<Person> {
        self.block_on(async {
            sqlx::query_as::<_, Person>(
                "SELECT id, name, job_title, birthday FROM persons WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| ImportError::NotFound {
                name: format!("person {id}"),
            })
        })
    }

    /// All persons, ordered by id.
    pub fn list_persons(&self) -> ImportResult<Vec<Person>> {
        self.block_on(async {
            Ok(sqlx::query_as::<_, Person>(
                "SELECT id, name, job_title, birthday FROM persons ORDER BY id",
            )
            .fetch_all(self.pool())
            .await?)
        })
    }

    /// Update all fields of an existing person.
    pub fn update_person(&self, person: &Person) -> ImportResult<()> {
        self.block_on(async {
            let result = sqlx::query(
                "UPDATE persons SET name = ?, job_title = ?, birthday = ? WHERE id = ?",
            )
            .bind(&person.name)
            .bind(&person.job_title)
            .bind(person.birthday)
            .bind(person.id)
            .execute(self.pool())
            .await
            .map_err(|e| ImportError::from_sqlx(e, &person.name))?;

            if result.rows_affected() == 0 {
                return Err(ImportError::NotFound {
                    name: format!("person {}", person.id),
                });
            }
            Ok(())
        })
    }

    /// Delete a person; returns whether a row existed.
    pub fn delete_person(&self, id: i64) -> ImportResult<bool> {
        self.block_on(async {
            let result = sqlx::query("DELETE FROM persons WHERE id = ?")
                .bind(id)
                .execute(self.pool())
                .await?;
            Ok(result.rows_affected() > 0)
        })
    }

    /// Insert a new project, returning it with its assigned id.
    pub fn create_project(&self, new: &NewProject) -> ImportResult<Project> {
        self.block_on(async {
            let result = sqlx::query(
                "INSERT INTO projects (name, address, contractor, start_date, end_date)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&new.name)
            .bind(&new.address)
            .bind(&new.contractor)
            .bind(new.start_date)
            .bind(new.end_date)
            .execute(self.pool())
            .await
            .map_err(|e| ImportError::from_sqlx(e, &new.name))?;

            Ok(Project {
                id: result.last_insert_rowid(),
                name: new.name.clone(),
                address: new.address.clone(),
                contractor: new.contractor.clone(),
                start_date: new.start_date,
                end_date: new.end_date,
            })
        })
    }

    /// Fetch a project by id.
    pub fn get_project(&self, id: i64) -> ImportResult<Project> {
        self.block_on(async {
            sqlx::query_as::<_, Project>(
                "SELECT id, name, address, contractor, start_date, end_date
                 FROM projects WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| ImportError::NotFound {
                name: format!("project {id}"),
            })
        })
    }

    /// All projects, ordered by id.
    pub fn list_projects(&self) -> ImportResult<Vec<Project>> {
        self.block_on(async {
            Ok(sqlx::query_as::<_, Project>(
                "SELECT id, name, address, contractor, start_date, end_date
                 FROM projects ORDER BY id",
            )
            .fetch_all(self.pool())
            .await?)
        })
    }

    /// Update all fields of an existing project.
    pub fn update_project(&self, project: &Project) -> ImportResult<()> {
        self.block_on(async {
            let result = sqlx::query(
                "UPDATE projects SET name = ?, address = ?, contractor = ?,
                 start_date = ?, end_date = ? WHERE id = ?",
            )
            .bind(&project.name)
            .bind(&project.address)
            .bind(&project.contractor)
            .bind(project.start_date)
            .bind(project.end_date)
            .bind(project.id)
            .execute(self.pool())
            .await
            .map_err(|e| ImportError::from_sqlx(e, &project.name))?;

            if result.rows_affected() == 0 {
                return Err(ImportError::NotFound {
                    name: format!("project {}", project.id),
                });
            }
            Ok(())
        })
    }

    /// Delete a project; returns whether a row existed.
    pub fn delete_project(&self, id: i64) -> ImportResult<bool> {
        self.block_on(async {
            let result = sqlx::query("DELETE FROM projects WHERE id = ?")
                .bind(id)
                .execute(self.pool())
                .await?;
            Ok(result.rows_affected() > 0)
        })
    }
}
