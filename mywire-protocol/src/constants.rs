//! Server error-code table.
//!
//! Maps numeric MySQL server error codes to their symbolic `ER_*` names.
//! The table is read-only and shared by every sequence; codes missing
//! from it translate to [`UNKNOWN_CODE`] rather than failing the lookup.

/// Sentinel symbol for error codes the table does not know.
pub const UNKNOWN_CODE: &str = "UNKNOWN_CODE_PLEASE_REPORT";

static ERROR_SYMBOLS: phf::Map<u16, &'static str> = phf::phf_map! {
    1022u16 => "ER_DUP_KEY",
    1032u16 => "ER_KEY_NOT_FOUND",
    1036u16 => "ER_OPEN_AS_READONLY",
    1037u16 => "ER_OUTOFMEMORY",
    1038u16 => "ER_OUT_OF_SORTMEMORY",
    1040u16 => "ER_CON_COUNT_ERROR",
    1042u16 => "ER_BAD_HOST_ERROR",
    1043u16 => "ER_HANDSHAKE_ERROR",
    1044u16 => "ER_DBACCESS_DENIED_ERROR",
    1045u16 => "ER_ACCESS_DENIED_ERROR",
    1046u16 => "ER_NO_DB_ERROR",
    1047u16 => "ER_UNKNOWN_COM_ERROR",
    1048u16 => "ER_BAD_NULL_ERROR",
    1049u16 => "ER_BAD_DB_ERROR",
    1050u16 => "ER_TABLE_EXISTS_ERROR",
    1051u16 => "ER_BAD_TABLE_ERROR",
    1052u16 => "ER_NON_UNIQ_ERROR",
    1053u16 => "ER_SERVER_SHUTDOWN",
    1054u16 => "ER_BAD_FIELD_ERROR",
    1055u16 => "ER_WRONG_FIELD_WITH_GROUP",
    1058u16 => "ER_WRONG_VALUE_COUNT",
    1059u16 => "ER_TOO_LONG_IDENT",
    1060u16 => "ER_DUP_FIELDNAME",
    1061u16 => "ER_DUP_KEYNAME",
    1062u16 => "ER_DUP_ENTRY",
    1064u16 => "ER_PARSE_ERROR",
    1065u16 => "ER_EMPTY_QUERY",
    1066u16 => "ER_NONUNIQ_TABLE",
    1067u16 => "ER_INVALID_DEFAULT",
    1068u16 => "ER_MULTIPLE_PRI_KEY",
    1069u16 => "ER_TOO_MANY_KEYS",
    1071u16 => "ER_TOO_LONG_KEY",
    1074u16 => "ER_TOO_BIG_FIELDLENGTH",
    1075u16 => "ER_WRONG_AUTO_KEY",
    1081u16 => "ER_IPSOCK_ERROR",
    1082u16 => "ER_NO_SUCH_INDEX",
    1090u16 => "ER_CANT_REMOVE_ALL_FIELDS",
    1091u16 => "ER_CANT_DROP_FIELD_OR_KEY",
    1094u16 => "ER_NO_SUCH_THREAD",
    1095u16 => "ER_KILL_DENIED_ERROR",
    1096u16 => "ER_NO_TABLES_USED",
    1099u16 => "ER_TABLE_NOT_LOCKED_FOR_WRITE",
    1100u16 => "ER_TABLE_NOT_LOCKED",
    1103u16 => "ER_WRONG_TABLE_NAME",
    1104u16 => "ER_TOO_BIG_SELECT",
    1109u16 => "ER_UNKNOWN_TABLE",
    1110u16 => "ER_FIELD_SPECIFIED_TWICE",
    1113u16 => "ER_TABLE_MUST_HAVE_COLUMNS",
    1114u16 => "ER_RECORD_FILE_FULL",
    1115u16 => "ER_UNKNOWN_CHARACTER_SET",
    1118u16 => "ER_TOO_BIG_ROWSIZE",
    1129u16 => "ER_HOST_IS_BLOCKED",
    1130u16 => "ER_HOST_NOT_PRIVILEGED",
    1131u16 => "ER_PASSWORD_ANONYMOUS_USER",
    1132u16 => "ER_PASSWORD_NOT_ALLOWED",
    1133u16 => "ER_PASSWORD_NO_MATCH",
    1136u16 => "ER_WRONG_VALUE_COUNT_ON_ROW",
    1138u16 => "ER_INVALID_USE_OF_NULL",
    1141u16 => "ER_NONEXISTING_GRANT",
    1142u16 => "ER_TABLEACCESS_DENIED_ERROR",
    1143u16 => "ER_COLUMNACCESS_DENIED_ERROR",
    1146u16 => "ER_NO_SUCH_TABLE",
    1147u16 => "ER_NONEXISTING_TABLE_GRANT",
    1148u16 => "ER_NOT_ALLOWED_COMMAND",
    1149u16 => "ER_SYNTAX_ERROR",
    1152u16 => "ER_ABORTING_CONNECTION",
    1153u16 => "ER_NET_PACKET_TOO_LARGE",
    1155u16 => "ER_NET_FCNTL_ERROR",
    1156u16 => "ER_NET_PACKETS_OUT_OF_ORDER",
    1157u16 => "ER_NET_UNCOMPRESS_ERROR",
    1158u16 => "ER_NET_READ_ERROR",
    1159u16 => "ER_NET_READ_INTERRUPTED",
    1160u16 => "ER_NET_ERROR_ON_WRITE",
    1161u16 => "ER_NET_WRITE_INTERRUPTED",
    1162u16 => "ER_TOO_LONG_STRING",
    1166u16 => "ER_WRONG_COLUMN_NAME",
    1169u16 => "ER_DUP_UNIQUE",
    1170u16 => "ER_BLOB_KEY_WITHOUT_LENGTH",
    1171u16 => "ER_PRIMARY_CANT_HAVE_NULL",
    1172u16 => "ER_TOO_MANY_ROWS",
    1173u16 => "ER_REQUIRES_PRIMARY_KEY",
    1177u16 => "ER_CHECK_NO_SUCH_TABLE",
    1178u16 => "ER_CHECK_NOT_IMPLEMENTED",
    1179u16 => "ER_CANT_DO_THIS_DURING_AN_TRANSACTION",
    1184u16 => "ER_NEW_ABORTING_CONNECTION",
    1203u16 => "ER_TOO_MANY_USER_CONNECTIONS",
    1205u16 => "ER_LOCK_WAIT_TIMEOUT",
    1206u16 => "ER_LOCK_TABLE_FULL",
    1207u16 => "ER_READ_ONLY_TRANSACTION",
    1213u16 => "ER_LOCK_DEADLOCK",
    1215u16 => "ER_CANNOT_ADD_FOREIGN",
    1216u16 => "ER_NO_REFERENCED_ROW",
    1217u16 => "ER_ROW_IS_REFERENCED",
    1226u16 => "ER_USER_LIMIT_REACHED",
    1227u16 => "ER_SPECIFIC_ACCESS_DENIED_ERROR",
    1235u16 => "ER_NOT_SUPPORTED_YET",
    1242u16 => "ER_SUBQUERY_NO_1_ROW",
    1243u16 => "ER_UNKNOWN_STMT_HANDLER",
    1248u16 => "ER_DERIVED_MUST_HAVE_ALIAS",
    1251u16 => "ER_NOT_SUPPORTED_AUTH_MODE",
    1264u16 => "ER_WARN_DATA_OUT_OF_RANGE",
    1265u16 => "WARN_DATA_TRUNCATED",
    1286u16 => "ER_UNKNOWN_STORAGE_ENGINE",
    1290u16 => "ER_OPTION_PREVENTS_STATEMENT",
    1292u16 => "ER_TRUNCATED_WRONG_VALUE",
    1305u16 => "ER_SP_DOES_NOT_EXIST",
    1317u16 => "ER_QUERY_INTERRUPTED",
    1364u16 => "ER_NO_DEFAULT_FOR_FIELD",
    1366u16 => "ER_TRUNCATED_WRONG_VALUE_FOR_FIELD",
    1406u16 => "ER_DATA_TOO_LONG",
    1451u16 => "ER_ROW_IS_REFERENCED_2",
    1452u16 => "ER_NO_REFERENCED_ROW_2",
    1461u16 => "ER_MAX_PREPARED_STMT_COUNT_REACHED",
    1615u16 => "ER_NEED_REPREPARE",
    1690u16 => "ER_DATA_OUT_OF_RANGE",
};

/// Looks up the symbolic name for a server error code.
pub fn error_symbol(errno: u16) -> Option<&'static str> {
    ERROR_SYMBOLS.get(&errno).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(error_symbol(1045), Some("ER_ACCESS_DENIED_ERROR"));
        assert_eq!(error_symbol(1062), Some("ER_DUP_ENTRY"));
        assert_eq!(error_symbol(1146), Some("ER_NO_SUCH_TABLE"));
        assert_eq!(error_symbol(1156), Some("ER_NET_PACKETS_OUT_OF_ORDER"));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(error_symbol(0), None);
        assert_eq!(error_symbol(59999), None);
    }
}
