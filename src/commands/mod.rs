pub mod check;

pub type CmdResult<T> = sbomcheck::Result<(T, i32)>;
