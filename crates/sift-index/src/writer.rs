//! Index writer for adding items to the Tantivy index.

use std::{fs, path::Path};

use tantivy::{Index, IndexWriter as TantivyIndexWriter, TantivyDocument};

use crate::{
    analyzer::{SIFT_TOKENIZER, build_analyzer_from_name},
    document::Item,
    error::IndexError,
    schema::IndexSchema,
};

/// Default heap size for the index writer (50 MB).
const DEFAULT_HEAP_SIZE: usize = 50_000_000;

/// Writes items to a Tantivy index.
///
/// Items are assigned an ordinal in insertion order; the ordinal is the
/// deterministic tie-breaker for equally scored hits at query time.
pub struct IndexWriter {
    /// The Tantivy index.
    index: Index,
    /// The underlying Tantivy writer.
    writer: TantivyIndexWriter,
    /// Schema with field handles.
    schema: IndexSchema,
    /// Ordinal assigned to the next item.
    next_ordinal: u64,
}

impl IndexWriter {
    /// Opens or creates an index at the given path with English stemming.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        Self::open_with_language(path, "english")
    }

    /// Opens or creates an index at the given path.
    ///
    /// If the index doesn't exist it is created with the standard schema;
    /// otherwise it is opened and the analyzer registered.
    pub fn open_with_language(path: &Path, language: &str) -> Result<Self, IndexError> {
        let schema = IndexSchema::new();

        fs::create_dir_all(path)?;

        let dir = tantivy::directory::MmapDirectory::open(path).map_err(|e| {
            let err: tantivy::TantivyError = e.into();
            IndexError::unavailable(path.to_path_buf(), &err)
        })?;

        let index = Index::open_or_create(dir, schema.schema().clone())
            .map_err(|e| IndexError::unavailable(path.to_path_buf(), &e))?;

        let analyzer = build_analyzer_from_name(language)?;
        index.tokenizers().register(SIFT_TOKENIZER, analyzer);

        let writer = index
            .writer(DEFAULT_HEAP_SIZE)
            .map_err(|e| IndexError::unavailable(path.to_path_buf(), &e))?;

        // Continue ordinals after any existing documents.
        let next_ordinal = index
            .reader()
            .map_err(|e| IndexError::execute(&e))?
            .searcher()
            .num_docs();

        Ok(Self {
            index,
            writer,
            schema,
            next_ordinal,
        })
    }

    /// Adds an item to the index.
    ///
    /// The item is staged for writing but not visible until [`commit`](Self::commit).
    pub fn add_item(&mut self, item: &Item) -> Result<(), IndexError> {
        let mut doc = TantivyDocument::new();

        doc.add_text(self.schema.id, &item.id);
        doc.add_text(self.schema.name, &item.name);
        doc.add_text(self.schema.name_exact, item.name.to_lowercase());
        doc.add_text(self.schema.path, &item.path);
        for ancestor in &item.ancestors {
            doc.add_text(self.schema.ancestors, ancestor);
        }
        doc.add_text(self.schema.language, &item.language);
        doc.add_text(self.schema.template, &item.template);
        doc.add_text(self.schema.body, &item.body);
        doc.add_text(self.schema.body_exact, item.body.to_lowercase());
        doc.add_u64(self.schema.ordinal, self.next_ordinal);

        self.writer
            .add_document(doc)
            .map_err(|e| IndexError::write(&e))?;
        self.next_ordinal += 1;
        Ok(())
    }

    /// Adds multiple items to the index.
    pub fn add_items(&mut self, items: &[Item]) -> Result<(), IndexError> {
        for item in items {
            self.add_item(item)?;
        }
        Ok(())
    }

    /// Commits all pending changes, making them visible to readers.
    pub fn commit(&mut self) -> Result<(), IndexError> {
        self.writer.commit().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Rolls back any uncommitted changes.
    pub fn rollback(&mut self) -> Result<(), IndexError> {
        self.writer.rollback().map_err(|e| IndexError::commit(&e))?;
        Ok(())
    }

    /// Deletes all documents from the index.
    pub fn delete_all(&mut self) -> Result<(), IndexError> {
        self.writer
            .delete_all_documents()
            .map_err(|e| IndexError::write(&e))?;
        Ok(())
    }

    /// Returns the number of committed documents in the index.
    pub fn num_docs(&self) -> Result<u64, IndexError> {
        let reader = self.index.reader().map_err(|e| IndexError::execute(&e))?;
        Ok(reader.searcher().num_docs())
    }
}
