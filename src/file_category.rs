/// File categorization by extension.
///
/// The mapping from extensions to categories is a fixed table. Lookup is
/// case-insensitive and anything not listed falls into [`Category::Other`].
///
/// # Examples
///
/// ```
/// use clean_folder::file_category::{Category, FileMapper};
///
/// let mapper = FileMapper::default();
/// assert_eq!(mapper.categorize(Some("png")), Category::Image);
/// assert_eq!(mapper.categorize(Some("MKV")), Category::Video);
/// assert_eq!(mapper.categorize(None), Category::Other);
/// ```
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Represents one of the six output categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// JPEG, PNG, JPG, SVG
    #[serde(rename = "images")]
    Image,
    /// AVI, MP4, MOV, MKV
    Video,
    /// DOC, DOCX, TXT, PDF, XLSX, PPTX
    #[serde(rename = "documents")]
    Document,
    /// MP3, OGG, WAV, AMR
    Audio,
    /// ZIP, GZ, TAR
    #[serde(rename = "archives")]
    Archive,
    /// Everything else, including files without an extension
    Other,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 6] = [
        Category::Image,
        Category::Video,
        Category::Document,
        Category::Audio,
        Category::Archive,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Video.dir_name(), "video");
    /// assert_eq!(Category::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Video => "video",
            Category::Document => "documents",
            Category::Audio => "audio",
            Category::Archive => "archives",
            Category::Other => "other",
        }
    }

    /// Returns the report heading for this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Image => "Images files",
            Category::Video => "Video files",
            Category::Document => "Documents files",
            Category::Audio => "Audio files",
            Category::Archive => "Archives files",
            Category::Other => "Other files",
        }
    }

    /// Returns true if `name` is the directory name of any category.
    pub fn is_category_dir(name: &str) -> bool {
        Self::ALL.iter().any(|category| category.dir_name() == name)
    }
}

/// Maps file extensions to categories.
#[derive(Debug, Clone)]
pub struct FileMapper {
    extension_map: HashMap<&'static str, Category>,
}

impl FileMapper {
    /// Creates a new `FileMapper` holding the fixed extension table.
    pub fn new() -> Self {
        let table: [(&[&'static str], Category); 5] = [
            (&["JPEG", "PNG", "JPG", "SVG"], Category::Image),
            (&["AVI", "MP4", "MOV", "MKV"], Category::Video),
            (
                &["DOC", "DOCX", "TXT", "PDF", "XLSX", "PPTX"],
                Category::Document,
            ),
            (&["MP3", "OGG", "WAV", "AMR"], Category::Audio),
            (&["ZIP", "GZ", "TAR"], Category::Archive),
        ];

        let extension_map = table
            .iter()
            .flat_map(|(extensions, category)| extensions.iter().map(move |ext| (*ext, *category)))
            .collect();

        Self { extension_map }
    }

    /// Maps a file extension to a category, if it is in the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.extension_to_category("pdf"), Some(Category::Document));
    /// assert_eq!(mapper.extension_to_category("rs"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(ext.to_uppercase().as_str()).copied()
    }

    /// Determines the category for an optional extension, defaulting to `Other`.
    pub fn categorize(&self, ext: Option<&str>) -> Category {
        ext.and_then(|extension| self.extension_to_category(extension))
            .unwrap_or(Category::Other)
    }

    /// Determines the category of a path from its last suffix.
    pub fn categorize_path(&self, path: &Path) -> Category {
        let ext = path.extension().map(|e| e.to_string_lossy());
        self.categorize(ext.as_deref())
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Image.dir_name(), "images");
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Document.dir_name(), "documents");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Archive.dir_name(), "archives");
        assert_eq!(Category::Other.dir_name(), "other");
    }

    #[test]
    fn test_every_table_extension_routes_to_its_category() {
        let mapper = FileMapper::default();
        let expected = [
            ("JPEG", Category::Image),
            ("PNG", Category::Image),
            ("JPG", Category::Image),
            ("SVG", Category::Image),
            ("AVI", Category::Video),
            ("MP4", Category::Video),
            ("MOV", Category::Video),
            ("MKV", Category::Video),
            ("DOC", Category::Document),
            ("DOCX", Category::Document),
            ("TXT", Category::Document),
            ("PDF", Category::Document),
            ("XLSX", Category::Document),
            ("PPTX", Category::Document),
            ("MP3", Category::Audio),
            ("OGG", Category::Audio),
            ("WAV", Category::Audio),
            ("AMR", Category::Audio),
            ("ZIP", Category::Archive),
            ("GZ", Category::Archive),
            ("TAR", Category::Archive),
        ];

        for (ext, category) in expected {
            assert_eq!(mapper.categorize(Some(ext)), category, "extension {ext}");
        }
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize(Some("jpg")), Category::Image);
        assert_eq!(mapper.categorize(Some("Mp3")), Category::Audio);
    }

    #[test]
    fn test_unlisted_extensions_route_to_other() {
        let mapper = FileMapper::default();
        assert_eq!(mapper.categorize(Some("rs")), Category::Other);
        assert_eq!(mapper.categorize(Some("gif")), Category::Other);
        assert_eq!(mapper.categorize(Some("")), Category::Other);
        assert_eq!(mapper.categorize(None), Category::Other);
    }

    #[test]
    fn test_categorize_path_uses_last_suffix() {
        let mapper = FileMapper::default();
        assert_eq!(
            mapper.categorize_path(Path::new("backup.tar.gz")),
            Category::Archive
        );
        assert_eq!(
            mapper.categorize_path(Path::new("report.pdf.bak")),
            Category::Other
        );
        assert_eq!(mapper.categorize_path(Path::new("Makefile")), Category::Other);
    }

    #[test]
    fn test_is_category_dir() {
        assert!(Category::is_category_dir("images"));
        assert!(Category::is_category_dir("archives"));
        assert!(!Category::is_category_dir("Images"));
        assert!(!Category::is_category_dir("photos"));
    }

    #[test]
    fn test_serializes_as_dir_name() {
        for category in Category::ALL {
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                serde_json::Value::from(category.dir_name())
            );
        }
    }
}
