mod property_cursor;
mod property_strings;
