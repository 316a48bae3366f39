use crate::apdu::CommandApdu;
use crate::fs::{DirectoryAccess, FileCreator, FileSystem};
use crate::iso::IsoSession;
use crate::status::{IsoError, IsoResult};

pub fn handle_create_file(
    session: &mut IsoSession,
    fs: &mut FileSystem,
    apdu: &CommandApdu,
) -> IsoResult<()> {
    if apdu.p1 != 0 || apdu.p2 != 0 {
        return Err(IsoError::IncorrectP1P2);
    }

    // sempre sotto la DF corrente
    let current = session.current_df(fs);
    let mut creator = FileCreator::prepare(current);
    session.reader.parse(apdu.data, &mut creator)?;

    let access = if creator.is_creating_df()? {
        DirectoryAccess::CreateDf
    } else {
        DirectoryAccess::CreateEf
    };
    fs.access_directory(current, access)?;

    let file = creator.create(fs)?;
    session.select_file(fs, file);
    Ok(())
}
