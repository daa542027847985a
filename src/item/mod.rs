/// This module provides the CSV record reader, writer and binder facade.
pub mod csv;
