//! Schema catalog for configuration files.
//!
//! A catalog lists, per file kind, the blocks that may appear and the
//! options each block carries. Declaration order is significant: it fixes
//! the order of mapped options and marks a child option as the one declared
//! right after its parent.
//!
//! Catalogs are written in XML:
//!
//! ```xml
//! <Template>
//!   <File name="Systems" paths="universe/systems/*/*.ini">
//!     <Block name="Object" multiple="true" identifier="nickname">
//!       <Option name="nickname"/>
//!       <Option name="pos" kind="point"/>
//!       <Option name="dock_with" rename="dock, docking"/>
//!       <Option name="base" multiple="true"/>
//!       <Option name="loadout" parent="base" multiple="true"/>
//!     </Block>
//!   </File>
//! </Template>
//! ```
//!
//! All block and option lookups ignore ASCII case.

mod error;
mod from_xml;
mod schema;

pub use error::{Error, Result};
pub use schema::{OptionKind, SchemaBlock, SchemaCatalog, SchemaFile, SchemaOption};
