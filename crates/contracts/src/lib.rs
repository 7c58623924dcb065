//! Общие типы backend и клиентов админки менторской программы:
//! агрегаты коллекций, DTO импорта и прогресса, перечисления.

pub mod domain;
pub mod enums;
pub mod shared;
pub mod usecases;
