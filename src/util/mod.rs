pub mod one_indexed_vec;
