use crate::{
    dto::{
        controller::{ImportCsvRequest, ImportMode},
        validation::validate_team_names,
    },
    error::ServiceError,
    state::{SharedState, game::Game, transitions::run_with_broadcast},
};

/// Extract team names from pasted CSV: first field of each non-blank line.
pub fn parse_team_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let first = line.split(',').next().unwrap_or_default().trim();
            (!first.is_empty()).then(|| first.to_string())
        })
        .collect()
}

/// Import the names in `request` into the roster. Returns the imported count and game.
pub async fn import_csv(
    state: &SharedState,
    request: ImportCsvRequest,
) -> Result<(usize, Game), ServiceError> {
    let names = parse_team_names(&request.csv_text);
    if names.is_empty() {
        return Err(ServiceError::InvalidInput(
            "no team names found in CSV text".into(),
        ));
    }
    validate_team_names(&names).map_err(|err| {
        ServiceError::InvalidInput(
            err.message
                .map(|message| message.into_owned())
                .unwrap_or_else(|| err.code.into_owned()),
        )
    })?;

    let count = names.len();
    let (_, game) = match request.mode {
        ImportMode::Replace => {
            run_with_broadcast(state, "import_csv_replace", |engine| {
                engine.replace_teams(&names)
            })
            .await?
        }
        ImportMode::Add => {
            run_with_broadcast(state, "import_csv_add", |engine| engine.add_teams(&names)).await?
        }
    };
    Ok((count, game))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::snapshot_store::FileSnapshotStore,
        dto::validation::MAX_TEAM_NAME_LEN,
        state::AppState,
    };

    #[test]
    fn takes_first_field_of_each_line() {
        let text = "Owls, Table 1\r\n\r\n  Foxes  \n,empty first\nBadgers,3,x\n";
        assert_eq!(parse_team_names(text), ["Owls", "Foxes", "Badgers"]);
    }

    #[test]
    fn blank_text_yields_nothing() {
        assert!(parse_team_names(" \n\r\n ,,\n").is_empty());
    }

    #[tokio::test]
    async fn overlong_names_are_refused_before_import() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default().with_snapshot_path(dir.path().join("game.json"));
        let store = Arc::new(FileSnapshotStore::new(config.snapshot_path().clone()));
        let state = AppState::new(config, store);

        let long_name = "x".repeat(MAX_TEAM_NAME_LEN + 1);
        let request = ImportCsvRequest {
            csv_text: format!("Owls\n{long_name},table 2\n"),
            mode: ImportMode::Replace,
        };
        let err = import_csv(&state, request).await.unwrap_err();
        assert!(matches!(&err, ServiceError::InvalidInput(message) if message.contains("longer than")));
        assert!(state.game_snapshot().await.teams.is_empty());

        let request = ImportCsvRequest {
            csv_text: format!("Owls\n{},table 2\n", "x".repeat(MAX_TEAM_NAME_LEN)),
            mode: ImportMode::Add,
        };
        let (imported, game) = import_csv(&state, request).await.unwrap();
        assert_eq!(imported, 2);
        assert_eq!(game.teams.len(), 2);
    }
}
