pub(crate) mod raw_block;
