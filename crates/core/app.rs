use eyre::eyre;
use log::info;

use crate::interact::{user_input, user_secret};

/// Where to write imported books, as given on the command line or in the environment.
pub struct Credentials {
    token: Option<String>,
    database: Option<String>,
}

impl Credentials {
    pub fn new(token: Option<String>, database: Option<String>) -> Self {
        // an exported but empty variable counts as not set
        let present = |s: &String| !s.trim().is_empty();
        Self {
            token: token.filter(present),
            database: database.filter(present),
        }
    }

    /// Returns the token and database id, prompting for whichever is missing when `interact`
    /// is set.
    pub fn resolve(self, interact: bool) -> eyre::Result<(String, String)> {
        let token = match (self.token, interact) {
            (Some(token), _) => token,
            (None, true) => user_secret("Notion integration token")?,
            (None, false) => {
                return Err(eyre!(
                    "No Notion token given - use --token, set NOTION_TOKEN or run with --interact"
                ))
            }
        };

        let database = match (self.database, interact) {
            (Some(database), _) => database,
            (None, true) => user_input("Notion database id")?,
            (None, false) => {
                return Err(eyre!(
                    "No Notion database id given - use --database, set NOTION_DATABASE_ID or run with --interact"
                ))
            }
        };

        info!("Importing into Notion database '{database}'");
        Ok((token, database))
    }
}
