//! The collection aggregate and its folders.
//!
//! A [`Collection`] owns every [`Request`] of a run, whether or not it sits in a
//! [`Folder`]. Folders only record which requests they hold, in their own sort order.
//! [`Collection::to_document`] produces the serializable snapshot written to stdout.

use crate::error::Result;
use crate::ordering::OrderedRequests;
use crate::request::{now_millis, Request};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Root aggregate of the generated collection
#[derive(Debug, Clone)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub timestamp: i64,
    folders: Vec<Folder>,
    requests: OrderedRequests<Request>,
}

/// A named group of requests, usually one per namespace
#[derive(Debug, Clone)]
pub struct Folder {
    pub id: String,
    pub collection_id: String,
    pub name: String,
    requests: OrderedRequests<String>,
}

/// Serialized form of a [`Collection`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDocument {
    pub id: String,
    pub name: String,
    pub timestamp: i64,
    pub requests: Vec<Request>,
    pub order: Vec<String>,
    pub folders: Vec<FolderDocument>,
}

/// Serialized form of a [`Folder`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderDocument {
    pub id: String,
    #[serde(rename = "collectionId")]
    pub collection_id: String,
    pub name: String,
    pub order: Vec<String>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        let collection = Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            timestamp: now_millis(),
            folders: Vec::new(),
            requests: OrderedRequests::new(),
        };
        debug!("Created collection {} ({})", collection.name, collection.id);
        collection
    }

    /// Attach a folder to this collection
    pub fn add_folder(&mut self, mut folder: Folder) -> &mut Folder {
        folder.collection_id = self.id.clone();
        debug!("Adding folder {} ({})", folder.name, folder.id);
        let index = self.folders.len();
        self.folders.push(folder);
        &mut self.folders[index]
    }

    pub fn find_folder(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name == name)
    }

    /// The first folder named `name`, created and attached if there is none yet
    pub fn get_folder(&mut self, name: &str) -> &mut Folder {
        match self.folders.iter().position(|f| f.name == name) {
            Some(index) => &mut self.folders[index],
            None => self.add_folder(Folder::new(name)),
        }
    }

    /// Take ownership of a request and re-sort.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MethodOrdering`](crate::error::Error::MethodOrdering) if the
    /// request's method has no canonical rank.
    pub fn add_request(&mut self, mut request: Request) -> Result<()> {
        request.collection_id = self.id.clone();
        let method = request.method.clone();
        let name = request.name.clone();
        self.requests.insert(&method, &name, request)
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Every request, in sort order
    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter()
    }

    /// Ids of the requests that are not in any folder, in sort order
    pub fn order(&self) -> Vec<String> {
        self.requests
            .iter()
            .filter(|r| r.folder_id().is_none())
            .map(|r| r.id.clone())
            .collect()
    }

    /// Snapshot of the collection in its serialized shape
    pub fn to_document(&self) -> CollectionDocument {
        CollectionDocument {
            id: self.id.clone(),
            name: self.name.clone(),
            timestamp: self.timestamp,
            requests: self.requests.iter().cloned().collect(),
            order: self.order(),
            folders: self.folders.iter().map(Folder::to_document).collect(),
        }
    }
}

impl Folder {
    /// Create a detached folder; [`Collection::add_folder`] sets its collection id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            collection_id: String::new(),
            name: name.into(),
            requests: OrderedRequests::new(),
        }
    }

    /// Record `request` as a member of this folder and re-sort.
    ///
    /// The request itself still has to be added to the collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MethodOrdering`](crate::error::Error::MethodOrdering) if the
    /// request's method has no canonical rank.
    pub fn add_request(&mut self, request: &mut Request) -> Result<()> {
        self.requests
            .insert(&request.method, &request.name, request.id.clone())?;
        request.set_folder(&self.id);
        Ok(())
    }

    /// Ids of this folder's requests, in sort order
    pub fn order(&self) -> Vec<String> {
        self.requests.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn to_document(&self) -> FolderDocument {
        FolderDocument {
            id: self.id.clone(),
            collection_id: self.collection_id.clone(),
            name: self.name.clone(),
            order: self.order(),
        }
    }
}
