pub mod iwb;
