// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Development server hook.
//!
//! The server keeps the last pipeline result in a single cell. Filesystem
//! notifications for `.svg` files under the icon directory rebuild the sprite
//! synchronously, rewrite the identifier module, and bump the reload
//! generation that pages poll to trigger a full reload. Everything runs on the
//! thread that calls [`DevServer::serve`]; the cell is simply overwritten by
//! the latest run.
//!
//! Pages opt into live reload by loading the client served at
//! [`CLIENT_ROUTE`]:
//!
//! ```html
//! <script src="http://127.0.0.1:5174/__icon-sprite/client.js"></script>
//! ```
//!
//! The client polls [`RELOAD_ROUTE`] and reloads the page once the
//! generation changes.

use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
    time::Duration
};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, error, info, warn};

use crate::{
    config::SpriteSettings,
    error::Error,
    pipeline::{emit_artifacts, generate_sprite_data},
    scan::icon_name,
    sprite::SpriteBuild
};

/// Route serving the sprite document.
pub const SPRITE_ROUTE: &str = "/sprite.svg";
/// Route serving the reload generation counter.
pub const RELOAD_ROUTE: &str = "/__icon-sprite/reload";
/// Route serving the live reload client script.
pub const CLIENT_ROUTE: &str = "/__icon-sprite/client.js";

const CLIENT_SCRIPT: &str = r#"(() => {
  const endpoint = new URL("/__icon-sprite/reload", document.currentScript.src);
  let seen = null;
  setInterval(async () => {
    try {
      const response = await fetch(endpoint, { cache: "no-store" });
      const generation = (await response.text()).trim();
      if (seen !== null && generation !== seen) {
        location.reload();
      }
      seen = generation;
    } catch (_) {}
  }, 1000);
})();
"#;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Response produced for one development request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevResponse {
    /// Sprite document served as `image/svg+xml`.
    Sprite(String),
    /// Current reload generation served as plain text.
    ReloadGeneration(u64),
    /// Live reload client served as JavaScript.
    ClientScript(&'static str),
    /// The route is unknown or no sprite is available.
    NotFound
}

/// Development server state: settings, cached sprite, reload generation.
#[derive(Debug)]
pub struct DevServer {
    settings:          SpriteSettings,
    watch_root:        PathBuf,
    cache:             Option<SpriteBuild>,
    reload_generation: u64,
    watching:          bool
}

impl DevServer {
    /// Creates the server state. No pipeline run happens until
    /// [`start`](Self::start) or the first sprite request.
    pub fn new(settings: SpriteSettings) -> Self {
        let watch_root = canonical_root(&settings.icons_dir);
        Self {
            settings,
            watch_root,
            cache: None,
            reload_generation: 0,
            watching: false
        }
    }

    /// Runs the pipeline once and writes artifacts when icons were found.
    ///
    /// # Errors
    ///
    /// Propagates pipeline and artifact write failures.
    pub fn start(&mut self) -> Result<(), Error> {
        self.rebuild()
    }

    /// Returns the cached pipeline result, if any.
    pub fn cached(&self) -> Option<&SpriteBuild> {
        self.cache.as_ref()
    }

    /// Number of full reloads requested since the server started.
    pub fn reload_generation(&self) -> u64 {
        self.reload_generation
    }

    /// Returns `true` when `path` is an icon source inside the icon directory.
    pub fn is_watched_change(&self, path: &Path) -> bool {
        let inside =
            path.starts_with(&self.watch_root) || path.starts_with(&self.settings.icons_dir);
        let is_icon = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(icon_name)
            .is_some();
        inside && is_icon
    }

    /// Handles a change notification for `path`.
    ///
    /// Returns `true` when the path belonged to the icon directory and the
    /// sprite was rebuilt and a full reload requested.
    ///
    /// # Errors
    ///
    /// Propagates pipeline and artifact write failures. The previous cache
    /// stays in place in that case.
    pub fn handle_change(&mut self, path: &Path) -> Result<bool, Error> {
        if !self.is_watched_change(path) {
            debug!("Ignoring change outside icon sources: {}", path.display());
            return Ok(false);
        }

        let file_name = path.file_name().map(|name| name.to_string_lossy());
        info!("Icon changed: {}", file_name.as_deref().unwrap_or_default());
        self.rebuild_and_reload()?;
        Ok(true)
    }

    /// Starts watching the icon directory once it exists.
    ///
    /// Returns `true` when the directory is being watched and `false` while it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Watch`] when the watcher rejects the directory.
    pub fn watch_icons_dir<W: Watcher>(&mut self, watcher: &mut W) -> Result<bool, Error> {
        if self.watching {
            return Ok(true);
        }
        if !self.settings.icons_dir.is_dir() {
            return Ok(false);
        }

        watcher.watch(&self.settings.icons_dir, RecursiveMode::NonRecursive)?;
        self.watch_root = canonical_root(&self.settings.icons_dir);
        self.watching = true;
        info!("Watching {} for icon changes", self.settings.icons_dir.display());
        Ok(true)
    }

    /// Answers a request for `url`, computing the sprite lazily when the
    /// cache is empty. Query strings are ignored.
    ///
    /// # Errors
    ///
    /// Propagates pipeline failures from the lazy computation.
    pub fn handle_request(&mut self, url: &str) -> Result<DevResponse, Error> {
        let route = url.split('?').next().unwrap_or_default();

        match route {
            SPRITE_ROUTE => {
                if self.cache.is_none() {
                    self.cache = Some(generate_sprite_data(&self.settings.icons_dir)?);
                }
                Ok(match self.cache.as_ref() {
                    Some(build) if !build.sprite.is_empty() => {
                        DevResponse::Sprite(build.sprite.clone())
                    }
                    _ => DevResponse::NotFound
                })
            }
            RELOAD_ROUTE => Ok(DevResponse::ReloadGeneration(self.reload_generation)),
            CLIENT_ROUTE => Ok(DevResponse::ClientScript(CLIENT_SCRIPT)),
            _ => Ok(DevResponse::NotFound)
        }
    }

    /// Binds the configured address, watches the icon directory, and serves
    /// requests until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serve`] when the address cannot be bound or the
    /// listener fails, and [`Error::Watch`] when the watcher cannot start.
    pub fn serve(mut self) -> Result<(), Error> {
        self.start()?;

        let address = self.settings.dev_address.clone();
        let server = Server::http(address.as_str())
            .map_err(|e| Error::serve(format!("failed to bind {address}: {e}")))?;

        let (tx, rx) = mpsc::channel();
        let mut watcher: RecommendedWatcher = Watcher::new(
            move |event: Result<Event, notify::Error>| {
                let _ = tx.send(event);
            },
            notify::Config::default()
        )?;

        if !self.watch_icons_dir(&mut watcher)? {
            warn!(
                "Icons directory {} does not exist yet, watching starts once it is created",
                self.settings.icons_dir.display()
            );
        }

        info!("Serving icon sprite at http://{address}{SPRITE_ROUTE}");
        info!("Live reload client available at http://{address}{CLIENT_ROUTE}");

        loop {
            if let Err(e) = self.attach_created_dir(&mut watcher) {
                error!("Failed to attach icons directory: {}", e.to_display_string());
            }
            self.drain_events(&rx);

            match server.recv_timeout(POLL_INTERVAL) {
                Ok(Some(request)) => self.respond(request)?,
                Ok(None) => {}
                Err(e) => return Err(Error::serve(format!("failed to receive request: {e}")))
            }
        }
    }

    /// Attaches an icon directory created after startup. Files it already
    /// holds produced no notifications, so the sprite is rebuilt right away.
    fn attach_created_dir<W: Watcher>(&mut self, watcher: &mut W) -> Result<bool, Error> {
        if self.watching || !self.watch_icons_dir(watcher)? {
            return Ok(false);
        }
        self.rebuild_and_reload()?;
        Ok(true)
    }

    fn rebuild_and_reload(&mut self) -> Result<(), Error> {
        self.rebuild()?;
        self.reload_generation += 1;
        info!("Full reload requested (generation {})", self.reload_generation);
        Ok(())
    }

    fn rebuild(&mut self) -> Result<(), Error> {
        let build = generate_sprite_data(&self.settings.icons_dir)?;
        emit_artifacts(&build, &self.settings)?;
        self.cache = Some(build);
        Ok(())
    }

    fn drain_events(&mut self, events: &Receiver<Result<Event, notify::Error>>) {
        while let Ok(event) = events.try_recv() {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    warn!("Watcher error: {e}");
                    continue;
                }
            };

            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                continue;
            }

            let Some(path) = event.paths.iter().find(|path| self.is_watched_change(path)) else {
                continue;
            };

            if let Err(e) = self.handle_change(path) {
                error!("Failed to regenerate icon sprite: {}", e.to_display_string());
            }
        }
    }

    fn respond(&mut self, request: Request) -> Result<(), Error> {
        let outcome = match self.handle_request(request.url()) {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to build icon sprite: {}", e.to_display_string());
                let reply = Response::from_string("Internal Server Error").with_status_code(500);
                if let Err(e) = request.respond(reply) {
                    warn!("Failed to answer request: {e}");
                }
                return Ok(());
            }
        };

        let result = match outcome {
            DevResponse::Sprite(body) => request.respond(
                Response::from_string(body)
                    .with_header(header("Content-Type", "image/svg+xml")?)
                    .with_header(header("Cache-Control", "no-cache")?)
            ),
            DevResponse::ReloadGeneration(generation) => request.respond(
                Response::from_string(generation.to_string())
                    .with_header(header("Content-Type", "text/plain; charset=utf-8")?)
                    .with_header(header("Cache-Control", "no-cache")?)
                    .with_header(header("Access-Control-Allow-Origin", "*")?)
            ),
            DevResponse::ClientScript(script) => request.respond(
                Response::from_string(script)
                    .with_header(header("Content-Type", "text/javascript; charset=utf-8")?)
                    .with_header(header("Cache-Control", "no-cache")?)
            ),
            DevResponse::NotFound => {
                request.respond(Response::from_string("Not Found").with_status_code(404))
            }
        };

        if let Err(e) = result {
            warn!("Failed to answer request: {e}");
        }
        Ok(())
    }
}

fn canonical_root(icons_dir: &Path) -> PathBuf {
    icons_dir.canonicalize().unwrap_or_else(|_| icons_dir.to_path_buf())
}

fn header(name: &str, value: &str) -> Result<Header, Error> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| Error::serve(format!("invalid header {name}: {value}")))
}
