pub mod ops_resolve;
