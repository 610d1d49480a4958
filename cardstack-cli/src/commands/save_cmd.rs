//! Settings flow: pick images for a page and save them.

use clap::Args;
use std::path::{Path, PathBuf};

use cardstack_core::data_uri::{encode_data_uri, mime_type_for_path};
use cardstack_core::{CardSide, PageId, SaveError, SaveOutcome, SettingsSession, StorageError};

use crate::client::{build_client, ClientError};
use crate::config::Config;

/// Upload new images and save the page
#[derive(Debug, Args)]
pub struct SaveCommand {
    /// Image file for the front of the card
    #[arg(long, conflicts_with = "remove_front")]
    front: Option<PathBuf>,

    /// Image file for the back of the card
    #[arg(long, conflicts_with = "remove_back")]
    back: Option<PathBuf>,

    /// URL of the QR code image
    #[arg(long, conflicts_with = "clear_qr")]
    qr: Option<String>,

    /// Remove the front image
    #[arg(long)]
    remove_front: bool,

    /// Remove the back image
    #[arg(long)]
    remove_back: bool,

    /// Remove the QR code
    #[arg(long)]
    clear_qr: bool,
}

impl SaveCommand {
    pub fn run(&self, config: &Config, page_id: PageId) -> Result<(), SaveCommandError> {
        let client = build_client(config)?;

        // Read image files before touching the network
        let front = self.front.as_deref().map(read_image).transpose()?;
        let back = self.back.as_deref().map(read_image).transpose()?;

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| SaveCommandError::RuntimeError(e.to_string()))?;

        rt.block_on(async {
            let session = SettingsSession::new(&client, page_id);
            session.load_existing().await;

            if self.remove_front {
                session.remove_image(CardSide::Front)?;
            }
            if self.remove_back {
                session.remove_image(CardSide::Back)?;
            }

            session.update_draft(|draft| {
                if let Some(data) = front {
                    draft.set_image(CardSide::Front, data);
                }
                if let Some(data) = back {
                    draft.set_image(CardSide::Back, data);
                }
                if self.clear_qr {
                    draft.set_qr_url(None);
                } else if let Some(qr) = &self.qr {
                    draft.set_qr_url(Some(qr.clone()));
                }
            });

            let draft = session.draft();
            let uploads_pending = CardSide::ALL.iter().any(|side| draft.needs_upload(*side));
            if uploads_pending && config.image_host.api_key.is_none() {
                return Err(SaveCommandError::MissingImageHostKey);
            }

            println!("Saving page {}...", session.page_id());
            match session.save().await? {
                SaveOutcome::Saved { location } => {
                    println!("Saved.");
                    println!("View: {}", location);
                }
                SaveOutcome::SavedLocally { location } => {
                    println!("Document store unavailable; images kept locally only.");
                    println!("View: {}", location);
                }
                SaveOutcome::AlreadyInProgress => {
                    println!("A save is already in progress.");
                }
            }

            Ok(())
        })
    }
}

/// Reads an image file as a data URI.
fn read_image(path: &Path) -> Result<String, SaveCommandError> {
    let mime = mime_type_for_path(path)
        .ok_or_else(|| SaveCommandError::UnsupportedImage(path.to_path_buf()))?;
    let bytes =
        std::fs::read(path).map_err(|e| SaveCommandError::ReadError(path.to_path_buf(), e))?;
    Ok(encode_data_uri(&bytes, mime))
}

/// Errors from the save command
#[derive(Debug)]
pub enum SaveCommandError {
    ClientError(ClientError),
    SaveError(SaveError),
    StorageError(StorageError),
    ReadError(PathBuf, std::io::Error),
    UnsupportedImage(PathBuf),
    MissingImageHostKey,
    RuntimeError(String),
}

impl std::fmt::Display for SaveCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveCommandError::ClientError(e) => write!(f, "{}", e),
            SaveCommandError::SaveError(e) => write!(f, "{}", e),
            SaveCommandError::StorageError(e) => write!(f, "{}", e),
            SaveCommandError::ReadError(path, e) => {
                write!(f, "Failed to read image '{}': {}", path.display(), e)
            }
            SaveCommandError::UnsupportedImage(path) => {
                write!(f, "Not a supported image file: {}", path.display())
            }
            SaveCommandError::MissingImageHostKey => write!(
                f,
                "Image host not configured. Add image_host.api_key to config or set CARDSTACK_IMAGE_HOST_KEY."
            ),
            SaveCommandError::RuntimeError(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

impl std::error::Error for SaveCommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveCommandError::ClientError(e) => Some(e),
            SaveCommandError::SaveError(e) => Some(e),
            SaveCommandError::StorageError(e) => Some(e),
            SaveCommandError::ReadError(_, e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClientError> for SaveCommandError {
    fn from(e: ClientError) -> Self {
        SaveCommandError::ClientError(e)
    }
}

impl From<SaveError> for SaveCommandError {
    fn from(e: SaveError) -> Self {
        SaveCommandError::SaveError(e)
    }
}

impl From<StorageError> for SaveCommandError {
    fn from(e: StorageError) -> Self {
        SaveCommandError::StorageError(e)
    }
}
