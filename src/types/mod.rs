pub mod accident_record;
pub mod lat_lon;
pub mod time_of_day;
