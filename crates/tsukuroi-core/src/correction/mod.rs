//! # Correction
//!
//! Rule-driven standardization of entity graphs. A [`CorrectionService`]
//! walks everything reachable from a root entity and applies the rules
//! registered for each entity's type, recording every change as a
//! [`ChangeRecord`].
//!
//! ```rust
//! use tsukuroi_core::correction::{CorrectionService, PropertyRule, TagSequenceReplacer};
//! use tsukuroi_core::model::{Release, Tag, shared};
//!
//! let service = CorrectionService::new();
//! let replacer = TagSequenceReplacer::from_names(&["H", "264"], &["H.264"]).unwrap();
//! service.register::<Release>(PropertyRule::<Vec<Tag>>::new("H.264", "tags", replacer));
//!
//! let release = shared(Release {
//!     tags: Tag::list(["WEB", "H", "264"]),
//!     ..Release::default()
//! });
//! let changes = service.process_shared(&release).unwrap();
//! assert_eq!(changes.len(), 1);
//! assert_eq!(release.read().tags, Tag::list(["WEB", "H.264"]));
//! ```

pub mod change;
pub mod rule;
pub mod rules;
pub mod service;
pub mod tags;

pub use change::ChangeRecord;
pub use rule::{FnRule, PropertyRule, Recorder, Replacer, Rule, TextPropertiesRule};
pub use rules::{NameCorrector, TextCleaner, register_standard};
pub use service::CorrectionService;
pub use tags::{QueryMode, ReplaceScope, TagDeduplicator, TagSequenceReplacer};
