//! Numeric extraction for structured text documents
//!
//!     This crate pulls every number out of a JSON, YAML, TOML, INI, dotenv or CSV document, in
//!     document order, and then optionally deduplicates, sorts, filters and analyzes them.
//!
//! Architecture
//!
//!     - Extractor trait: uniform interface for every format (parse, collect, report failure)
//!     - ExtractorRegistry: selection of the extractor for a detected file type
//!     - Value model: parsed trees are mapped onto one tagged union and walked by a visitor
//!     - Post-processing: dedupe, sort, filter and statistics over the extracted list
//!
//!     This is a pure lib: it powers numex-cli but is shell agnostic. No code here prints, reads
//!     environment variables or exits the process. Parse failures are values, see
//!     [ExtractionResult].
//!
//!     The file structure :
//!     .
//!     ├── error.rs            # FormatError and the result-level ParseError
//!     ├── file_type.rs        # FileType and extension detection
//!     ├── numeric.rs          # permissive / strict parsing and number rendering
//!     ├── value.rs            # value tree and the numeric visitor
//!     ├── format.rs           # Extractor trait definition
//!     ├── registry.rs         # ExtractorRegistry
//!     ├── extraction.rs       # ExtractionResult and entry points
//!     ├── formats
//!     │   └── <format>.rs     # one extractor per format
//!     ├── postprocess.rs      # dedupe, sort, filter
//!     ├── analysis.rs         # statistics and the analysis report
//!     ├── safety.rs           # size and output thresholds
//!     └── performance.rs      # operation metrics and the result cache
//!
//! Coercion
//!
//!     Whether a string value counts as a number depends on the format. JSON, YAML and TOML only
//!     count native numbers. INI, dotenv and CSV values are all text, so they go through the
//!     permissive parse: the longest leading decimal literal wins, `"50%"` is 50 and `"$10"` is
//!     nothing.

pub mod analysis;
pub mod error;
pub mod extraction;
pub mod file_type;
pub mod format;
pub mod formats;
pub mod numeric;
pub mod performance;
pub mod postprocess;
pub mod registry;
pub mod safety;
pub mod value;

pub use analysis::{analyze_numbers, AnalysisReport, AnalysisResult};
pub use error::{ErrorKind, FormatError, ParseError};
pub use extraction::{extract_numbers, parse_numbers_document, ExtractionResult};
pub use file_type::{detect_file_type, FileType};
pub use format::Extractor;
pub use numeric::{format_number, join_lines, parse_float_prefix};
pub use performance::{PerformanceMetrics, PerformanceMonitor, PerformanceTracker};
pub use postprocess::{dedupe_numbers, filter_numbers, sort_numbers, SortMode};
pub use registry::ExtractorRegistry;
pub use safety::{SafetyCheckResult, SafetySettings};
