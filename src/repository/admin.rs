use diesel::prelude::*;

use crate::domain::admin::{Admin, NewAdmin, NewOtpCode, OtpCode};
use crate::domain::types::{EmailAddress, OtpPurpose};
use crate::models::admin::{
    Admin as DbAdmin, NewAdmin as DbNewAdmin, NewOtpCode as DbNewOtpCode, OtpCode as DbOtpCode,
};
use crate::repository::{
    AdminReader, AdminWriter, DieselRepository, OtpReader, OtpWriter, RepositoryResult,
};

impl AdminReader for DieselRepository {
    fn get_admin_by_email(&self, email: &EmailAddress) -> RepositoryResult<Option<Admin>> {
        use crate::schema::admins;

        let mut conn = self.conn()?;

        let admin = admins::table
            .filter(admins::email.eq(email.as_str()))
            .first::<DbAdmin>(&mut conn)
            .optional()?;

        match admin {
            Some(admin) => Ok(Some(admin.try_into()?)),
            None => Ok(None),
        }
    }
}

impl AdminWriter for DieselRepository {
    fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<Admin> {
        use crate::schema::admins;

        let mut conn = self.conn()?;

        let admin = diesel::insert_into(admins::table)
            .values(DbNewAdmin::from(admin))
            .get_result::<DbAdmin>(&mut conn)?;

        Ok(admin.try_into()?)
    }

    fn update_admin_password(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> RepositoryResult<usize> {
        use crate::schema::admins;

        let mut conn = self.conn()?;

        let affected = diesel::update(admins::table.filter(admins::email.eq(email.as_str())))
            .set(admins::password_hash.eq(password_hash))
            .execute(&mut conn)?;

        Ok(affected)
    }
}

impl OtpReader for DieselRepository {
    fn get_latest_otp(
        &self,
        email: &EmailAddress,
        purpose: OtpPurpose,
    ) -> RepositoryResult<Option<OtpCode>> {
        use crate::schema::otp_codes;

        let mut conn = self.conn()?;

        let otp = otp_codes::table
            .filter(otp_codes::email.eq(email.as_str()))
            .filter(otp_codes::purpose.eq(purpose.as_str()))
            .order(otp_codes::id.desc())
            .first::<DbOtpCode>(&mut conn)
            .optional()?;

        match otp {
            Some(otp) => Ok(Some(otp.try_into()?)),
            None => Ok(None),
        }
    }
}

impl OtpWriter for DieselRepository {
    fn create_otp(&self, otp: &NewOtpCode) -> RepositoryResult<usize> {
        use crate::schema::otp_codes;

        let mut conn = self.conn()?;

        let affected = diesel::insert_into(otp_codes::table)
            .values(DbNewOtpCode::from(otp))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_otps(&self, email: &EmailAddress, purpose: OtpPurpose) -> RepositoryResult<usize> {
        use crate::schema::otp_codes;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            otp_codes::table
                .filter(otp_codes::email.eq(email.as_str()))
                .filter(otp_codes::purpose.eq(purpose.as_str())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
