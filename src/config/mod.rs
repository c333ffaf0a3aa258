pub mod deblend;
