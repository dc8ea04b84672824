pub mod wire_enum;
