//! In-memory remote services for sync tests.

use std::collections::HashMap;
use std::sync::Mutex;

use medsync_protocol::{ChunkAck, Folder, GirderFile, RemoteError, UploadHandle};
use medsync_transfer::{BoxFuture, FileService};

use crate::service::FolderService;

/// A folder tree keyed by id.
pub(crate) struct MockFolders {
    folders: Mutex<HashMap<String, Folder>>,
    next_id: Mutex<usize>,
    creates: Mutex<usize>,
    /// `(folder_id, public)` per access call.
    pub access_calls: Mutex<Vec<(String, bool)>>,
    /// `(folder_id, metadata)` per metadata call.
    pub metadata_calls: Mutex<Vec<(String, serde_json::Value)>>,
    pub fail_access: bool,
    /// Fail lookups for this folder name.
    pub fail_find_for: Option<String>,
}

impl MockFolders {
    pub fn new(root_id: &str) -> Self {
        let mock = Self {
            folders: Mutex::new(HashMap::new()),
            next_id: Mutex::new(0),
            creates: Mutex::new(0),
            access_calls: Mutex::new(Vec::new()),
            metadata_calls: Mutex::new(Vec::new()),
            fail_access: false,
            fail_find_for: None,
        };
        mock.folders.lock().unwrap().insert(
            root_id.to_string(),
            folder(root_id, "root", None),
        );
        mock
    }

    /// Adds a second top-level folder.
    pub fn insert_root(&self, root_id: &str) {
        self.folders
            .lock()
            .unwrap()
            .insert(root_id.to_string(), folder(root_id, "root", None));
    }

    /// Adds a folder without counting it as a create call.
    pub fn insert(&self, parent_id: &str, name: &str) -> String {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("f{next}")
        };
        self.folders
            .lock()
            .unwrap()
            .insert(id.clone(), folder(&id, name, Some(parent_id)));
        id
    }

    pub fn child_id(&self, parent_id: &str, name: &str) -> Option<String> {
        self.folders
            .lock()
            .unwrap()
            .values()
            .find(|f| f.parent_id.as_deref() == Some(parent_id) && f.name == name)
            .map(|f| f.id.clone())
    }

    pub fn create_count(&self) -> usize {
        *self.creates.lock().unwrap()
    }

    pub fn parent_of(&self, id: &str) -> Option<String> {
        self.folders
            .lock()
            .unwrap()
            .get(id)
            .and_then(|f| f.parent_id.clone())
    }

    /// Folder names from below the root down to `id`.
    pub fn path_of(&self, id: &str) -> Vec<String> {
        let folders = self.folders.lock().unwrap();
        let mut names = Vec::new();
        let mut current = folders.get(id);
        while let Some(f) = current {
            let Some(parent) = f.parent_id.as_deref() else {
                break;
            };
            names.push(f.name.clone());
            current = folders.get(parent);
        }
        names.reverse();
        names
    }
}

fn folder(id: &str, name: &str, parent_id: Option<&str>) -> Folder {
    Folder {
        id: id.to_string(),
        name: name.to_string(),
        parent_id: parent_id.map(str::to_string),
        parent_collection: Some("folder".into()),
        public: false,
        meta: None,
    }
}

impl FolderService for MockFolders {
    fn find_child_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<Folder>, RemoteError>> {
        Box::pin(async move {
            if self.fail_find_for.as_deref() == Some(name) {
                return Err(RemoteError::Transport("connection refused".into()));
            }
            let folders = self.folders.lock().unwrap();
            let mut matches: Vec<&Folder> = folders
                .values()
                .filter(|f| f.parent_id.as_deref() == Some(parent_id) && f.name == name)
                .collect();
            matches.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(matches.first().map(|f| (*f).clone()))
        })
    }

    fn create_folder<'a>(
        &'a self,
        parent_id: &'a str,
        name: &'a str,
        _public: bool,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>> {
        Box::pin(async move {
            *self.creates.lock().unwrap() += 1;
            let id = self.insert(parent_id, name);
            Ok(folder(&id, name, Some(parent_id)))
        })
    }

    fn get_folder<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Folder, RemoteError>> {
        Box::pin(async move {
            self.folders
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| RemoteError::NotFound(format!("folder {id}")))
        })
    }

    fn set_access<'a>(
        &'a self,
        id: &'a str,
        public: bool,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>> {
        Box::pin(async move {
            self.access_calls.lock().unwrap().push((id.to_string(), public));
            if self.fail_access {
                return Err(RemoteError::Api {
                    status: 403,
                    body: "access denied".into(),
                });
            }
            let mut folders = self.folders.lock().unwrap();
            match folders.get_mut(id) {
                Some(f) => {
                    f.public = public;
                    Ok(f.clone())
                }
                None => Err(RemoteError::NotFound(format!("folder {id}"))),
            }
        })
    }

    fn set_metadata<'a>(
        &'a self,
        id: &'a str,
        metadata: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<Folder, RemoteError>> {
        Box::pin(async move {
            self.metadata_calls
                .lock()
                .unwrap()
                .push((id.to_string(), metadata.clone()));
            let mut folders = self.folders.lock().unwrap();
            match folders.get_mut(id) {
                Some(f) => {
                    f.meta = Some(metadata.clone());
                    Ok(f.clone())
                }
                None => Err(RemoteError::NotFound(format!("folder {id}"))),
            }
        })
    }
}

/// Accepts every upload; the last chunk returns the file document.
pub(crate) struct MockFiles {
    sizes: Mutex<HashMap<String, u64>>,
    /// `(folder_id, name, size)` per init call.
    pub uploads: Mutex<Vec<(String, String, u64)>>,
}

impl MockFiles {
    pub fn new() -> Self {
        Self {
            sizes: Mutex::new(HashMap::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.1.clone())
            .collect()
    }
}

impl FileService for MockFiles {
    fn init_upload<'a>(
        &'a self,
        folder_id: &'a str,
        name: &'a str,
        size: u64,
        _mime_type: &'a str,
    ) -> BoxFuture<'a, Result<UploadHandle, RemoteError>> {
        Box::pin(async move {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push((folder_id.to_string(), name.to_string(), size));
            let id = format!("up{}", uploads.len());
            self.sizes.lock().unwrap().insert(id.clone(), size);
            Ok(UploadHandle {
                id,
                size,
                received: 0,
            })
        })
    }

    fn send_chunk<'a>(
        &'a self,
        upload_id: &'a str,
        offset: u64,
        data: &'a [u8],
    ) -> BoxFuture<'a, Result<ChunkAck, RemoteError>> {
        Box::pin(async move {
            let size = self
                .sizes
                .lock()
                .unwrap()
                .get(upload_id)
                .copied()
                .unwrap_or_default();
            let received = offset + data.len() as u64;
            if received < size {
                return Ok(ChunkAck {
                    received: Some(received),
                    file: None,
                });
            }
            Ok(ChunkAck {
                received: None,
                file: Some(GirderFile {
                    id: format!("file-{upload_id}"),
                    name: String::new(),
                    size: Some(size),
                    mime_type: None,
                    item_id: None,
                }),
            })
        })
    }

    fn finalize_upload<'a>(
        &'a self,
        _upload_id: &'a str,
    ) -> BoxFuture<'a, Result<ChunkAck, RemoteError>> {
        Box::pin(async move { Ok(ChunkAck::default()) })
    }
}
