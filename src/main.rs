use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{bail, eyre, Result};
use serde::de::DeserializeOwned;

use readroom::{
    domain::reading::{Group, ListKind, Notification, NotificationFilter, Room, RoomStatus},
    infrastructure::{
        cli::{Cli, Command},
        config::Config,
        device_id::{DeviceIdResolver, JsonFileStore},
        fixture::FixtureFetcher,
    },
    presentation::{ListRow, ListView},
    trace_dbg,
    utils::{get_config_dir, get_data_dir, initialize_logging, initialize_panic_handler},
    Identified, PageSize, PaginatedList,
};

const DEVICE_STORE_FILE: &str = "device.json";

struct BrowseOptions {
    page_size: PageSize,
    pages: usize,
    prefetch_threshold: usize,
}

/// Resolve the fixture for `kind`, switching to `<stem>.<filter>.json` when
/// a filter is given.
fn resolve_fixture(
    kind: ListKind,
    fixture: &Path,
    fixtures_dir: Option<&Path>,
    filter: Option<&str>,
) -> Result<PathBuf> {
    let base = match fixtures_dir {
        Some(dir) if fixture.is_relative() => dir.join(fixture),
        _ => fixture.to_path_buf(),
    };

    let Some(filter) = filter else {
        return Ok(base);
    };
    let filter = match kind {
        ListKind::Notifications => NotificationFilter::from_str(filter)
            .map_err(|_| eyre!("unknown notification filter `{filter}`"))?
            .to_string(),
        ListKind::Rooms => RoomStatus::from_str(filter)
            .map_err(|_| eyre!("unknown room status `{filter}`"))?
            .to_string(),
        ListKind::Groups => bail!("group lists cannot be filtered"),
    };

    let stem = base
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("fixture path {} has no file name", base.display()))?;
    Ok(base.with_file_name(format!("{stem}.{filter}.json")))
}

async fn browse<T>(path: &Path, options: BrowseOptions) -> Result<()>
where
    T: Identified + ListRow + Clone + DeserializeOwned + Send + Sync + 'static,
{
    let fetcher = FixtureFetcher::<T>::from_file(path)?;
    let list = PaginatedList::new(fetcher, options.page_size);
    let view = ListView::new();

    let _subscription = list.subscribe(move |state| println!("-- {}", view.status_line(state)));

    list.refresh().await?;
    for _ in 0..options.pages {
        let state = list.state();
        if state.error().is_some() || state.is_exhausted() {
            break;
        }
        // Scrolled to the last loaded row
        let last_visible = state.len().saturating_sub(1);
        match list.load_more_if_near_end(last_visible, options.prefetch_threshold) {
            Some(handle) => handle.await?,
            None => break,
        }
    }

    for line in view.numbered().view(&list.state()) {
        println!("{line}");
    }
    list.dispose();
    Ok(())
}

async fn tokio_main() -> Result<()> {
    initialize_logging()?;

    initialize_panic_handler()?;

    let args = <Cli as Parser>::parse();

    let config_dir = args.config.unwrap_or_else(get_config_dir);
    let config = trace_dbg!(Config::load(&config_dir, &get_data_dir())?);

    match args.command {
        Command::Browse {
            kind,
            fixture,
            filter,
            pages,
            page_size,
        } => {
            let page_size = match page_size {
                Some(n) => PageSize::new(n).ok_or_else(|| eyre!("--page-size must be positive"))?,
                None => config.page_size_for(kind),
            };
            let path = resolve_fixture(
                kind,
                &fixture,
                config.fixtures_dir.as_deref(),
                filter.as_deref(),
            )?;
            log::info!("browsing {kind} from {}", path.display());

            let options = BrowseOptions {
                page_size,
                pages,
                prefetch_threshold: config.prefetch_threshold,
            };
            match kind {
                ListKind::Notifications => browse::<Notification>(&path, options).await?,
                ListKind::Rooms => browse::<Room>(&path, options).await?,
                ListKind::Groups => browse::<Group>(&path, options).await?,
            }
        }
        Command::DeviceId => {
            let store = JsonFileStore::new(get_data_dir().join(DEVICE_STORE_FILE));
            let resolver = DeviceIdResolver::new(Arc::new(store));
            println!("{}", resolver.get_device_id().await);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = tokio_main().await {
        eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
        Err(e)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_resolve_fixture_without_filter() {
        let path = resolve_fixture(
            ListKind::Groups,
            Path::new("groups.json"),
            Some(Path::new("/srv/fixtures")),
            None,
        )
        .expect("resolves");
        assert_eq!(path, PathBuf::from("/srv/fixtures/groups.json"));
    }

    #[test]
    fn test_resolve_fixture_with_filter() {
        let path = resolve_fixture(
            ListKind::Rooms,
            Path::new("/data/rooms.json"),
            Some(Path::new("/srv/fixtures")),
            Some("Upcoming"),
        )
        .expect("resolves");
        assert_eq!(path, PathBuf::from("/data/rooms.upcoming.json"));
    }

    #[test]
    fn test_resolve_fixture_rejects_bad_filters() {
        assert!(resolve_fixture(ListKind::Groups, Path::new("g.json"), None, Some("all")).is_err());
        assert!(
            resolve_fixture(ListKind::Notifications, Path::new("n.json"), None, Some("likes"))
                .is_err()
        );
    }
}
